use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{now, physician::require_physician, required};
use crate::db::DatabaseError;
use crate::models::*;

const CERTIFICATE_COLUMNS: &str = "id, physician_id, signed, created, updated";

fn certificate_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalCertificate> {
    Ok(MedicalCertificate {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        signed: row.get::<_, i32>(2)? != 0,
        created: row.get(3)?,
        updated: row.get(4)?,
    })
}

pub fn insert_certificate(
    conn: &Connection,
    draft: &MedicalCertificateDraft,
) -> Result<MedicalCertificate, DatabaseError> {
    let owner = require_physician(conn, required("owner_id", draft.owner_id)?)?;
    let stamp = now();
    conn.execute(
        "INSERT INTO medical_certificate (physician_id, signed, created, updated)
         VALUES (?1, ?2, ?3, ?4)",
        params![owner.id, draft.signed as i32, stamp, stamp],
    )?;
    Ok(MedicalCertificate {
        id: conn.last_insert_rowid(),
        owner_id: owner.id,
        signed: draft.signed,
        created: stamp,
        updated: stamp,
    })
}

pub fn get_certificate(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalCertificate>, DatabaseError> {
    let certificate = conn
        .query_row(
            &format!("SELECT {CERTIFICATE_COLUMNS} FROM medical_certificate WHERE id = ?1"),
            params![id],
            certificate_from_row,
        )
        .optional()?;
    Ok(certificate)
}

pub fn get_all_certificates(conn: &Connection) -> Result<Vec<MedicalCertificate>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CERTIFICATE_COLUMNS} FROM medical_certificate ORDER BY id"
    ))?;
    let rows = stmt.query_map([], certificate_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_certificate(
    conn: &Connection,
    existing: &MedicalCertificate,
    draft: &MedicalCertificateDraft,
) -> Result<MedicalCertificate, DatabaseError> {
    let owner_id = match draft.owner_id {
        Some(id) => require_physician(conn, id)?.id,
        None => existing.owner_id,
    };
    let stamp = now();
    conn.execute(
        "UPDATE medical_certificate SET physician_id = ?1, signed = ?2, updated = ?3 WHERE id = ?4",
        params![owner_id, draft.signed as i32, stamp, existing.id],
    )?;
    Ok(MedicalCertificate {
        id: existing.id,
        owner_id,
        signed: draft.signed,
        created: existing.created,
        updated: stamp,
    })
}

pub fn delete_certificate(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM medical_certificate WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("MedicalCertificate", id));
    }
    Ok(())
}
