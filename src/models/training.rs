use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// A physician's training period at a medical school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalTraining {
    pub id: i64,
    pub physician_id: i64,
    pub school_id: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalTrainingDraft {
    pub physician_id: Option<i64>,
    pub school_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl MedicalTrainingDraft {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DatabaseError::invalid(
                    "end_date",
                    "must not precede start_date",
                ));
            }
        }
        Ok(())
    }
}
