use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::validation::{require_range, require_text, MAX_LONG_TEXT, MAX_PERSON_NAME};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub year_of_birth: i32,
    pub home_address: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub smoker: bool,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub year_of_birth: i32,
    pub home_address: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub smoker: bool,
}

impl PatientDraft {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("first_name", &self.first_name, MAX_PERSON_NAME)?;
        require_text("last_name", &self.last_name, MAX_PERSON_NAME)?;
        require_text("home_address", &self.home_address, MAX_LONG_TEXT)?;
        require_range("year_of_birth", self.year_of_birth.into(), 1900, 2100)?;
        require_range("height_cm", self.height_cm.into(), 0, 300)?;
        require_range("weight_kg", self.weight_kg.into(), 0, 700)
    }
}
