use std::fmt;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::medicine::Medicine;
use super::patient::Patient;
use super::physician::Physician;
use super::validation::{optional_text, require_range, MAX_LONG_TEXT};
use crate::db::DatabaseError;

/// Identity of a prescription: the physician and patient it links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrescriptionKey {
    pub physician_id: i64,
    pub patient_id: i64,
}

impl PrescriptionKey {
    pub fn new(physician_id: i64, patient_id: i64) -> Self {
        Self {
            physician_id,
            patient_id,
        }
    }
}

impl fmt::Display for PrescriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.physician_id, self.patient_id)
    }
}

/// A prescription row.
///
/// The key is only ever derived from the attached physician and patient:
/// there is no setter for it, so the key and the associations cannot drift
/// apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prescription {
    id: PrescriptionKey,
    medicine_id: Option<i64>,
    pub number_of_refills: i32,
    pub prescription_information: Option<String>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Prescription {
    pub fn new(physician: &Physician, patient: &Patient) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: PrescriptionKey::new(physician.id, patient.id),
            medicine_id: None,
            number_of_refills: 0,
            prescription_information: None,
            created: now,
            updated: now,
        }
    }

    /// Rebuild from a stored row, whose key columns are the foreign keys.
    pub(crate) fn from_row(
        id: PrescriptionKey,
        medicine_id: Option<i64>,
        number_of_refills: i32,
        prescription_information: Option<String>,
        created: NaiveDateTime,
        updated: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            medicine_id,
            number_of_refills,
            prescription_information,
            created,
            updated,
        }
    }

    pub fn id(&self) -> PrescriptionKey {
        self.id
    }

    pub fn physician_id(&self) -> i64 {
        self.id.physician_id
    }

    pub fn patient_id(&self) -> i64 {
        self.id.patient_id
    }

    pub fn medicine_id(&self) -> Option<i64> {
        self.medicine_id
    }

    pub fn set_physician(&mut self, physician: &Physician) {
        self.id.physician_id = physician.id;
    }

    pub fn set_patient(&mut self, patient: &Patient) {
        self.id.patient_id = patient.id;
    }

    pub fn set_medicine(&mut self, medicine: Option<&Medicine>) {
        self.medicine_id = medicine.map(|m| m.id);
    }

    /// Copy the scalar fields of a draft.
    pub fn apply(&mut self, draft: &PrescriptionDraft) {
        self.number_of_refills = draft.number_of_refills;
        self.prescription_information = draft.prescription_information.clone();
    }
}

/// Create/update payload. Any `id` object sent by a client is ignored:
/// parents are addressed only through the `*_id` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionDraft {
    pub physician_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub medicine_id: Option<i64>,
    pub number_of_refills: i32,
    pub prescription_information: Option<String>,
}

impl PrescriptionDraft {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_range("number_of_refills", self.number_of_refills.into(), 0, 99)?;
        optional_text(
            "prescription_information",
            self.prescription_information.as_deref(),
            MAX_LONG_TEXT,
        )
    }
}
