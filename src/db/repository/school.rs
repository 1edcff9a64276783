use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;
use crate::db::DatabaseError;
use crate::models::*;

const SCHOOL_COLUMNS: &str = "id, name, is_public, created, updated";

fn school_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalSchool> {
    Ok(MedicalSchool {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: SchoolKind::from_is_public(row.get::<_, i32>(2)? != 0),
        created: row.get(3)?,
        updated: row.get(4)?,
    })
}

/// Count-style uniqueness probe on the school name, optionally ignoring
/// the school being renamed.
pub fn is_duplicate_school(
    conn: &Connection,
    name: &str,
    excluding_id: Option<i64>,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM medical_school WHERE name = ?1 AND id IS NOT ?2",
        params![name, excluding_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn duplicate_name(name: &str) -> DatabaseError {
    DatabaseError::Duplicate {
        entity_type: "medical_school".into(),
        detail: format!("a school named '{name}' already exists"),
    }
}

/// Insert a school. The subtype comes from the draft's `type` tag and is
/// fixed from here on.
pub fn insert_school(
    conn: &Connection,
    draft: &MedicalSchoolDraft,
) -> Result<MedicalSchool, DatabaseError> {
    draft.validate()?;
    let kind = draft.school_kind()?;
    if is_duplicate_school(conn, &draft.name, None)? {
        return Err(duplicate_name(&draft.name));
    }
    let stamp = now();
    conn.execute(
        "INSERT INTO medical_school (name, is_public, created, updated) VALUES (?1, ?2, ?3, ?4)",
        params![draft.name, kind.is_public() as i32, stamp, stamp],
    )?;
    Ok(MedicalSchool {
        id: conn.last_insert_rowid(),
        name: draft.name.clone(),
        kind,
        created: stamp,
        updated: stamp,
    })
}

pub fn get_school(conn: &Connection, id: i64) -> Result<Option<MedicalSchool>, DatabaseError> {
    let school = conn
        .query_row(
            &format!("SELECT {SCHOOL_COLUMNS} FROM medical_school WHERE id = ?1"),
            params![id],
            school_from_row,
        )
        .optional()?;
    Ok(school)
}

pub fn require_school(conn: &Connection, id: i64) -> Result<MedicalSchool, DatabaseError> {
    get_school(conn, id)?.ok_or_else(|| DatabaseError::unresolved("MedicalSchool", id))
}

pub fn get_all_schools(conn: &Connection) -> Result<Vec<MedicalSchool>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SCHOOL_COLUMNS} FROM medical_school ORDER BY id"
    ))?;
    let rows = stmt.query_map([], school_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Rename a school. Any `type` in the draft is ignored: the subtype never
/// changes after creation.
pub fn update_school(
    conn: &Connection,
    existing: &MedicalSchool,
    draft: &MedicalSchoolDraft,
) -> Result<MedicalSchool, DatabaseError> {
    draft.validate()?;
    if is_duplicate_school(conn, &draft.name, Some(existing.id))? {
        return Err(duplicate_name(&draft.name));
    }
    let stamp = now();
    conn.execute(
        "UPDATE medical_school SET name = ?1, updated = ?2 WHERE id = ?3",
        params![draft.name, stamp, existing.id],
    )?;
    Ok(MedicalSchool {
        name: draft.name.clone(),
        updated: stamp,
        ..existing.clone()
    })
}

/// Delete a school and the training records held there.
pub fn delete_school(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let trainings = conn.execute(
        "DELETE FROM medical_training WHERE school_id = ?1",
        params![id],
    )?;
    let deleted = conn.execute("DELETE FROM medical_school WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("MedicalSchool", id));
    }
    tracing::debug!(school_id = id, trainings, "School cascade delete");
    Ok(())
}
