use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::validation::{require_text, MAX_PERSON_NAME};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physician {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicianDraft {
    pub first_name: String,
    pub last_name: String,
}

impl PhysicianDraft {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("first_name", &self.first_name, MAX_PERSON_NAME)?;
        require_text("last_name", &self.last_name, MAX_PERSON_NAME)
    }
}
