use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;
use crate::db::DatabaseError;
use crate::models::*;

const PHYSICIAN_COLUMNS: &str = "id, first_name, last_name, created, updated";

fn physician_from_row(row: &Row<'_>) -> rusqlite::Result<Physician> {
    Ok(Physician {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        created: row.get(3)?,
        updated: row.get(4)?,
    })
}

pub fn insert_physician(conn: &Connection, draft: &PhysicianDraft) -> Result<Physician, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "INSERT INTO physician (first_name, last_name, created, updated)
         VALUES (?1, ?2, ?3, ?4)",
        params![draft.first_name, draft.last_name, stamp, stamp],
    )?;
    Ok(Physician {
        id: conn.last_insert_rowid(),
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        created: stamp,
        updated: stamp,
    })
}

pub fn get_physician(conn: &Connection, id: i64) -> Result<Option<Physician>, DatabaseError> {
    let physician = conn
        .query_row(
            &format!("SELECT {PHYSICIAN_COLUMNS} FROM physician WHERE id = ?1"),
            params![id],
            physician_from_row,
        )
        .optional()?;
    Ok(physician)
}

/// Resolve a physician referenced by another record's payload.
pub fn require_physician(conn: &Connection, id: i64) -> Result<Physician, DatabaseError> {
    get_physician(conn, id)?.ok_or_else(|| DatabaseError::unresolved("Physician", id))
}

pub fn get_all_physicians(conn: &Connection) -> Result<Vec<Physician>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHYSICIAN_COLUMNS} FROM physician ORDER BY id"
    ))?;
    let rows = stmt.query_map([], physician_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_physician(
    conn: &Connection,
    existing: &Physician,
    draft: &PhysicianDraft,
) -> Result<Physician, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "UPDATE physician SET first_name = ?1, last_name = ?2, updated = ?3 WHERE id = ?4",
        params![draft.first_name, draft.last_name, stamp, existing.id],
    )?;
    Ok(Physician {
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        updated: stamp,
        ..existing.clone()
    })
}

/// Delete a physician together with everything it owns: prescriptions,
/// certificates and training records. A linked login keeps existing but
/// loses its physician link.
pub fn delete_physician(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let prescriptions = conn.execute(
        "DELETE FROM prescription WHERE physician_id = ?1",
        params![id],
    )?;
    let certificates = conn.execute(
        "DELETE FROM medical_certificate WHERE physician_id = ?1",
        params![id],
    )?;
    let trainings = conn.execute(
        "DELETE FROM medical_training WHERE physician_id = ?1",
        params![id],
    )?;
    conn.execute(
        "UPDATE security_user SET physician_id = NULL WHERE physician_id = ?1",
        params![id],
    )?;
    let deleted = conn.execute("DELETE FROM physician WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Physician", id));
    }
    tracing::debug!(
        physician_id = id,
        prescriptions,
        certificates,
        trainings,
        "Physician cascade delete"
    );
    Ok(())
}
