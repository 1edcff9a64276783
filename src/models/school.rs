use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::SchoolKind;
use super::validation::{require_text, MAX_LONG_TEXT};
use crate::db::DatabaseError;

/// A medical school. Public and private schools share every field; the
/// `type` tag only selects which of the two a row is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalSchool {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SchoolKind,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

/// Create/update payload. The tag stays a raw string so a missing or
/// unknown value is reported as a field error instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalSchoolDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl MedicalSchoolDraft {
    pub fn new(name: &str, kind: SchoolKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.as_str().into()),
        }
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        require_text("name", &self.name, MAX_LONG_TEXT)
    }

    /// Subtype requested at construction.
    pub fn school_kind(&self) -> Result<SchoolKind, DatabaseError> {
        match self.kind.as_deref() {
            None => Err(DatabaseError::MissingDiscriminator {
                entity_type: "MedicalSchool".into(),
                field: "type".into(),
            }),
            Some(tag) => SchoolKind::from_str(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_reads_type_tag() {
        let draft: MedicalSchoolDraft =
            serde_json::from_str(r#"{"name":"University Medical School","type":"PublicSchool"}"#)
                .unwrap();
        assert_eq!(draft.school_kind().unwrap(), SchoolKind::Public);
    }

    #[test]
    fn draft_without_tag_is_missing_discriminator() {
        let draft: MedicalSchoolDraft = serde_json::from_str(r#"{"name":"Nowhere"}"#).unwrap();
        assert!(matches!(
            draft.school_kind(),
            Err(DatabaseError::MissingDiscriminator { .. })
        ));
    }

    #[test]
    fn draft_with_unknown_tag_is_invalid() {
        let draft: MedicalSchoolDraft =
            serde_json::from_str(r#"{"name":"Nowhere","type":"OnlineSchool"}"#).unwrap();
        assert!(matches!(
            draft.school_kind(),
            Err(DatabaseError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn school_serializes_type_field() {
        let school = MedicalSchool {
            id: 3,
            name: "Private Medical College".into(),
            kind: SchoolKind::Private,
            created: NaiveDateTime::default(),
            updated: NaiveDateTime::default(),
        };
        let json = serde_json::to_value(&school).unwrap();
        assert_eq!(json["type"], "PrivateSchool");
        assert_eq!(json["name"], "Private Medical College");
    }
}
