use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{now, physician::require_physician, required, school::require_school};
use crate::db::DatabaseError;
use crate::models::*;

const TRAINING_COLUMNS: &str =
    "id, physician_id, school_id, start_date, end_date, active, created, updated";

fn training_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalTraining> {
    Ok(MedicalTraining {
        id: row.get(0)?,
        physician_id: row.get(1)?,
        school_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        active: row.get::<_, i32>(5)? != 0,
        created: row.get(6)?,
        updated: row.get(7)?,
    })
}

pub fn insert_training(
    conn: &Connection,
    draft: &MedicalTrainingDraft,
) -> Result<MedicalTraining, DatabaseError> {
    draft.validate()?;
    let physician = require_physician(conn, required("physician_id", draft.physician_id)?)?;
    let school = require_school(conn, required("school_id", draft.school_id)?)?;
    let stamp = now();
    conn.execute(
        "INSERT INTO medical_training (physician_id, school_id, start_date, end_date, active, created, updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            physician.id,
            school.id,
            draft.start_date,
            draft.end_date,
            draft.active as i32,
            stamp,
            stamp,
        ],
    )?;
    Ok(MedicalTraining {
        id: conn.last_insert_rowid(),
        physician_id: physician.id,
        school_id: school.id,
        start_date: draft.start_date,
        end_date: draft.end_date,
        active: draft.active,
        created: stamp,
        updated: stamp,
    })
}

pub fn get_training(conn: &Connection, id: i64) -> Result<Option<MedicalTraining>, DatabaseError> {
    let training = conn
        .query_row(
            &format!("SELECT {TRAINING_COLUMNS} FROM medical_training WHERE id = ?1"),
            params![id],
            training_from_row,
        )
        .optional()?;
    Ok(training)
}

pub fn get_all_trainings(conn: &Connection) -> Result<Vec<MedicalTraining>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRAINING_COLUMNS} FROM medical_training ORDER BY id"
    ))?;
    let rows = stmt.query_map([], training_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_trainings_for_physician(
    conn: &Connection,
    physician_id: i64,
) -> Result<Vec<MedicalTraining>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRAINING_COLUMNS} FROM medical_training WHERE physician_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![physician_id], training_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Replace the training period fields; the physician or school moves only
/// when the draft names a new one.
pub fn update_training(
    conn: &Connection,
    existing: &MedicalTraining,
    draft: &MedicalTrainingDraft,
) -> Result<MedicalTraining, DatabaseError> {
    draft.validate()?;
    let physician_id = match draft.physician_id {
        Some(id) => require_physician(conn, id)?.id,
        None => existing.physician_id,
    };
    let school_id = match draft.school_id {
        Some(id) => require_school(conn, id)?.id,
        None => existing.school_id,
    };
    let stamp = now();
    conn.execute(
        "UPDATE medical_training SET physician_id = ?1, school_id = ?2, start_date = ?3,
                end_date = ?4, active = ?5, updated = ?6
         WHERE id = ?7",
        params![
            physician_id,
            school_id,
            draft.start_date,
            draft.end_date,
            draft.active as i32,
            stamp,
            existing.id,
        ],
    )?;
    Ok(MedicalTraining {
        id: existing.id,
        physician_id,
        school_id,
        start_date: draft.start_date,
        end_date: draft.end_date,
        active: draft.active,
        created: existing.created,
        updated: stamp,
    })
}

pub fn delete_training(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM medical_training WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("MedicalTraining", id));
    }
    Ok(())
}
