use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A certificate issued to exactly one physician (its owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCertificate {
    pub id: i64,
    pub owner_id: i64,
    pub signed: bool,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalCertificateDraft {
    pub owner_id: Option<i64>,
    pub signed: bool,
}
