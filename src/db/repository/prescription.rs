use rusqlite::{params, Connection, OptionalExtension, Row};

use super::medicine::require_medicine;
use super::patient::require_patient;
use super::physician::require_physician;
use super::{now, required};
use crate::db::DatabaseError;
use crate::models::*;

const PRESCRIPTION_COLUMNS: &str = "physician_id, patient_id, medicine_id, number_of_refills, \
                                    prescription_information, created, updated";

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription::from_row(
        PrescriptionKey::new(row.get(0)?, row.get(1)?),
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

pub fn get_prescription(
    conn: &Connection,
    key: PrescriptionKey,
) -> Result<Option<Prescription>, DatabaseError> {
    let prescription = conn
        .query_row(
            &format!(
                "SELECT {PRESCRIPTION_COLUMNS} FROM prescription
                 WHERE physician_id = ?1 AND patient_id = ?2"
            ),
            params![key.physician_id, key.patient_id],
            prescription_from_row,
        )
        .optional()?;
    Ok(prescription)
}

pub fn get_all_prescriptions(conn: &Connection) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescription ORDER BY physician_id, patient_id"
    ))?;
    let rows = stmt.query_map([], prescription_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Create a prescription. Physician, patient and medicine are all resolved
/// first; if any is missing nothing is written.
pub fn insert_prescription(
    conn: &Connection,
    draft: &PrescriptionDraft,
) -> Result<Prescription, DatabaseError> {
    draft.validate()?;
    let physician = require_physician(conn, required("physician_id", draft.physician_id)?)?;
    let patient = require_patient(conn, required("patient_id", draft.patient_id)?)?;
    let medicine = require_medicine(conn, required("medicine_id", draft.medicine_id)?)?;

    let mut prescription = Prescription::new(&physician, &patient);
    prescription.set_medicine(Some(&medicine));
    prescription.apply(draft);
    save_prescription(conn, &mut prescription, None)?;
    Ok(prescription)
}

/// Apply a draft to an existing prescription. A physician or patient id in
/// the draft re-attaches that parent, which re-keys the row.
pub fn update_prescription(
    conn: &Connection,
    existing: &Prescription,
    draft: &PrescriptionDraft,
) -> Result<Prescription, DatabaseError> {
    draft.validate()?;
    let mut prescription = existing.clone();
    if let Some(id) = draft.physician_id {
        prescription.set_physician(&require_physician(conn, id)?);
    }
    if let Some(id) = draft.patient_id {
        prescription.set_patient(&require_patient(conn, id)?);
    }
    if let Some(id) = draft.medicine_id {
        prescription.set_medicine(Some(&require_medicine(conn, id)?));
    }
    prescription.apply(draft);
    save_prescription(conn, &mut prescription, Some(existing.id()))?;
    Ok(prescription)
}

/// Single write path for prescriptions. The key columns are taken from the
/// prescription's attached physician and patient at the moment of writing.
fn save_prescription(
    conn: &Connection,
    prescription: &mut Prescription,
    previous: Option<PrescriptionKey>,
) -> Result<(), DatabaseError> {
    let key = prescription.id();
    let stamp = now();
    prescription.updated = stamp;
    match previous {
        None => {
            prescription.created = stamp;
            conn.execute(
                "INSERT INTO prescription (physician_id, patient_id, medicine_id, number_of_refills,
                                           prescription_information, created, updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    key.physician_id,
                    key.patient_id,
                    prescription.medicine_id(),
                    prescription.number_of_refills,
                    prescription.prescription_information,
                    stamp,
                    stamp,
                ],
            )?;
        }
        Some(old) => {
            let updated = conn.execute(
                "UPDATE prescription SET physician_id = ?1, patient_id = ?2, medicine_id = ?3,
                        number_of_refills = ?4, prescription_information = ?5, updated = ?6
                 WHERE physician_id = ?7 AND patient_id = ?8",
                params![
                    key.physician_id,
                    key.patient_id,
                    prescription.medicine_id(),
                    prescription.number_of_refills,
                    prescription.prescription_information,
                    stamp,
                    old.physician_id,
                    old.patient_id,
                ],
            )?;
            if updated == 0 {
                return Err(DatabaseError::not_found("Prescription", old));
            }
            if old != key {
                tracing::debug!(from = %old, to = %key, "Prescription re-keyed");
            }
        }
    }
    Ok(())
}

pub fn delete_prescription(conn: &Connection, key: PrescriptionKey) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM prescription WHERE physician_id = ?1 AND patient_id = ?2",
        params![key.physician_id, key.patient_id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Prescription", key));
    }
    Ok(())
}
