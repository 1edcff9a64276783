//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per table family. Every write path validates its draft
//! and resolves referenced parents before touching a row; deletes carry
//! their cascade steps explicitly. Callers wrap each operation in a
//! transaction so cascades and re-keying commit or roll back together.

mod certificate;
mod medicine;
mod patient;
mod physician;
mod prescription;
mod school;
mod security_user;
mod training;

use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;

use super::DatabaseError;
use crate::models::*;

/// Base repository operations for any entity
pub trait Repository: Sized {
    /// How a single row is addressed.
    type Key: Copy + Display;
    /// Create/update payload.
    type Draft;

    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;
    fn get(conn: &Connection, key: Self::Key) -> Result<Option<Self>, DatabaseError>;
    fn list(conn: &Connection) -> Result<Vec<Self>, DatabaseError>;
    fn insert(conn: &Connection, draft: &Self::Draft) -> Result<Self, DatabaseError>;
    fn update(conn: &Connection, existing: &Self, draft: &Self::Draft)
        -> Result<Self, DatabaseError>;
    fn delete(conn: &Connection, key: Self::Key) -> Result<(), DatabaseError>;
}

// Re-export all public items from sub-modules
pub use certificate::*;
pub use medicine::*;
pub use patient::*;
pub use physician::*;
pub use prescription::*;
pub use school::*;
pub use security_user::*;
pub use training::*;

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// A reference id the draft must carry for creation.
pub(crate) fn required(field: &str, id: Option<i64>) -> Result<i64, DatabaseError> {
    id.ok_or_else(|| DatabaseError::invalid(field, "is required"))
}

macro_rules! id_repository {
    ($entity:ty, $draft:ty, $name:literal, $get:ident, $list:ident, $insert:ident, $update:ident, $delete:ident) => {
        impl Repository for $entity {
            type Key = i64;
            type Draft = $draft;

            const ENTITY: &'static str = $name;

            fn key(&self) -> i64 {
                self.id
            }
            fn get(conn: &Connection, key: i64) -> Result<Option<Self>, DatabaseError> {
                $get(conn, key)
            }
            fn list(conn: &Connection) -> Result<Vec<Self>, DatabaseError> {
                $list(conn)
            }
            fn insert(conn: &Connection, draft: &$draft) -> Result<Self, DatabaseError> {
                $insert(conn, draft)
            }
            fn update(
                conn: &Connection,
                existing: &Self,
                draft: &$draft,
            ) -> Result<Self, DatabaseError> {
                $update(conn, existing, draft)
            }
            fn delete(conn: &Connection, key: i64) -> Result<(), DatabaseError> {
                $delete(conn, key)
            }
        }
    };
}

id_repository!(Physician, PhysicianDraft, "Physician",
    get_physician, get_all_physicians, insert_physician, update_physician, delete_physician);
id_repository!(Patient, PatientDraft, "Patient",
    get_patient, get_all_patients, insert_patient, update_patient, delete_patient);
id_repository!(Medicine, MedicineDraft, "Medicine",
    get_medicine, get_all_medicines, insert_medicine, update_medicine, delete_medicine);
id_repository!(MedicalSchool, MedicalSchoolDraft, "MedicalSchool",
    get_school, get_all_schools, insert_school, update_school, delete_school);
id_repository!(MedicalTraining, MedicalTrainingDraft, "MedicalTraining",
    get_training, get_all_trainings, insert_training, update_training, delete_training);
id_repository!(MedicalCertificate, MedicalCertificateDraft, "MedicalCertificate",
    get_certificate, get_all_certificates, insert_certificate, update_certificate, delete_certificate);

impl Repository for Prescription {
    type Key = PrescriptionKey;
    type Draft = PrescriptionDraft;

    const ENTITY: &'static str = "Prescription";

    fn key(&self) -> PrescriptionKey {
        self.id()
    }
    fn get(conn: &Connection, key: PrescriptionKey) -> Result<Option<Self>, DatabaseError> {
        get_prescription(conn, key)
    }
    fn list(conn: &Connection) -> Result<Vec<Self>, DatabaseError> {
        get_all_prescriptions(conn)
    }
    fn insert(conn: &Connection, draft: &PrescriptionDraft) -> Result<Self, DatabaseError> {
        insert_prescription(conn, draft)
    }
    fn update(
        conn: &Connection,
        existing: &Self,
        draft: &PrescriptionDraft,
    ) -> Result<Self, DatabaseError> {
        update_prescription(conn, existing, draft)
    }
    fn delete(conn: &Connection, key: PrescriptionKey) -> Result<(), DatabaseError> {
        delete_prescription(conn, key)
    }
}
