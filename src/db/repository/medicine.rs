use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;
use crate::db::DatabaseError;
use crate::models::*;

const MEDICINE_COLUMNS: &str =
    "id, drug_name, manufacturer_name, dosage_information, generic_name, created, updated";

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        drug_name: row.get(1)?,
        manufacturer_name: row.get(2)?,
        dosage_information: row.get(3)?,
        generic_name: row.get(4)?,
        created: row.get(5)?,
        updated: row.get(6)?,
    })
}

pub fn insert_medicine(conn: &Connection, draft: &MedicineDraft) -> Result<Medicine, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "INSERT INTO medicine (drug_name, manufacturer_name, dosage_information, generic_name, created, updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            draft.drug_name,
            draft.manufacturer_name,
            draft.dosage_information,
            draft.generic_name,
            stamp,
            stamp,
        ],
    )?;
    Ok(Medicine {
        id: conn.last_insert_rowid(),
        drug_name: draft.drug_name.clone(),
        manufacturer_name: draft.manufacturer_name.clone(),
        dosage_information: draft.dosage_information.clone(),
        generic_name: draft.generic_name.clone(),
        created: stamp,
        updated: stamp,
    })
}

pub fn get_medicine(conn: &Connection, id: i64) -> Result<Option<Medicine>, DatabaseError> {
    let medicine = conn
        .query_row(
            &format!("SELECT {MEDICINE_COLUMNS} FROM medicine WHERE id = ?1"),
            params![id],
            medicine_from_row,
        )
        .optional()?;
    Ok(medicine)
}

pub fn require_medicine(conn: &Connection, id: i64) -> Result<Medicine, DatabaseError> {
    get_medicine(conn, id)?.ok_or_else(|| DatabaseError::unresolved("Medicine", id))
}

pub fn get_all_medicines(conn: &Connection) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {MEDICINE_COLUMNS} FROM medicine ORDER BY id"))?;
    let rows = stmt.query_map([], medicine_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_medicine(
    conn: &Connection,
    existing: &Medicine,
    draft: &MedicineDraft,
) -> Result<Medicine, DatabaseError> {
    draft.validate()?;
    let stamp = now();
    conn.execute(
        "UPDATE medicine SET drug_name = ?1, manufacturer_name = ?2, dosage_information = ?3,
                generic_name = ?4, updated = ?5
         WHERE id = ?6",
        params![
            draft.drug_name,
            draft.manufacturer_name,
            draft.dosage_information,
            draft.generic_name,
            stamp,
            existing.id,
        ],
    )?;
    Ok(Medicine {
        drug_name: draft.drug_name.clone(),
        manufacturer_name: draft.manufacturer_name.clone(),
        dosage_information: draft.dosage_information.clone(),
        generic_name: draft.generic_name.clone(),
        updated: stamp,
        ..existing.clone()
    })
}

/// Delete a medicine. Prescriptions keep existing with their medicine
/// link cleared (the link is optional).
pub fn delete_medicine(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let detached = conn.execute(
        "UPDATE prescription SET medicine_id = NULL, updated = ?1 WHERE medicine_id = ?2",
        params![now(), id],
    )?;
    let deleted = conn.execute("DELETE FROM medicine WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Medicine", id));
    }
    tracing::debug!(medicine_id = id, detached, "Medicine delete");
    Ok(())
}
