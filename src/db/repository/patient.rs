use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;
use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str = "id, first_name, last_name, year_of_birth, home_address, \
                               height_cm, weight_kg, smoker, created, updated";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        year_of_birth: row.get(3)?,
        home_address: row.get(4)?,
        height_cm: row.get(5)?,
        weight_kg: row.get(6)?,
        smoker: row.get::<_, i32>(7)? != 0,
        created: row.get(8)?,
        updated: row.get(9)?,
    })
}

fn patient_from_draft(
    id: i64,
    draft: &PatientDraft,
    created: NaiveDateTime,
    updated: NaiveDateTime,
) -> Patient {
    Patient {
        id,
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        year_of_birth: draft.year_of_birth,
        home_address: draft.home_address.clone(),
        height_cm: draft.height_cm,
        weight_kg: draft.weight_kg,
        smoker: draft.smoker,
        created,
        updated,
    }
}

pub fn insert_patient(conn: &Connection, draft: &PatientDraft) -> Result<Patient, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "INSERT INTO patient (first_name, last_name, year_of_birth, home_address, height_cm, weight_kg, smoker, created, updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            draft.first_name,
            draft.last_name,
            draft.year_of_birth,
            draft.home_address,
            draft.height_cm,
            draft.weight_kg,
            draft.smoker as i32,
            stamp,
            stamp,
        ],
    )?;
    Ok(patient_from_draft(conn.last_insert_rowid(), draft, stamp, stamp))
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patient WHERE id = ?1"),
            params![id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn require_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    get_patient(conn, id)?.ok_or_else(|| DatabaseError::unresolved("Patient", id))
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patient ORDER BY id"))?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_patient(
    conn: &Connection,
    existing: &Patient,
    draft: &PatientDraft,
) -> Result<Patient, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "UPDATE patient SET first_name = ?1, last_name = ?2, year_of_birth = ?3, home_address = ?4,
                height_cm = ?5, weight_kg = ?6, smoker = ?7, updated = ?8
         WHERE id = ?9",
        params![
            draft.first_name,
            draft.last_name,
            draft.year_of_birth,
            draft.home_address,
            draft.height_cm,
            draft.weight_kg,
            draft.smoker as i32,
            stamp,
            existing.id,
        ],
    )?;
    Ok(patient_from_draft(existing.id, draft, existing.created, stamp))
}

/// Delete a patient and the prescriptions written for them.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let prescriptions = conn.execute(
        "DELETE FROM prescription WHERE patient_id = ?1",
        params![id],
    )?;
    let deleted = conn.execute("DELETE FROM patient WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    tracing::debug!(patient_id = id, prescriptions, "Patient cascade delete");
    Ok(())
}
