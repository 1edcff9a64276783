use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::validation::{optional_text, require_text, MAX_LONG_TEXT};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,
    pub drug_name: String,
    pub manufacturer_name: String,
    pub dosage_information: String,
    pub generic_name: Option<String>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicineDraft {
    pub drug_name: String,
    pub manufacturer_name: String,
    pub dosage_information: String,
    pub generic_name: Option<String>,
}

impl MedicineDraft {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("drug_name", &self.drug_name, MAX_LONG_TEXT)?;
        require_text("manufacturer_name", &self.manufacturer_name, MAX_LONG_TEXT)?;
        require_text("dosage_information", &self.dosage_information, MAX_LONG_TEXT)?;
        optional_text("generic_name", self.generic_name.as_deref(), MAX_LONG_TEXT)
    }
}
