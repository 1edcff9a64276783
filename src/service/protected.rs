//! Per-resource protection descriptors: which policy row guards an entity
//! and which physician, if any, owns a given instance.

use rusqlite::Connection;

use super::ServiceOptions;
use crate::authorization::ResourceType;
use crate::db::{DatabaseError, Repository};
use crate::identity;
use crate::models::*;

pub trait Protected: Repository {
    const RESOURCE: ResourceType;

    /// Owning physician, consulted by owner-based policies.
    fn owner_physician_id(&self) -> Option<i64> {
        None
    }

    /// Extra writes performed in the same transaction as a create.
    fn after_create(
        &self,
        _conn: &Connection,
        _options: &ServiceOptions,
    ) -> Result<(), DatabaseError> {
        Ok(())
    }
}

impl Protected for Physician {
    const RESOURCE: ResourceType = ResourceType::Physician;

    fn owner_physician_id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn after_create(&self, conn: &Connection, options: &ServiceOptions) -> Result<(), DatabaseError> {
        if let Some(password) = options.physician_user_password.as_deref() {
            identity::provision_physician_user(conn, self, password)?;
        }
        Ok(())
    }
}

impl Protected for Patient {
    const RESOURCE: ResourceType = ResourceType::Patient;
}

impl Protected for Medicine {
    const RESOURCE: ResourceType = ResourceType::Medicine;
}

impl Protected for MedicalSchool {
    const RESOURCE: ResourceType = ResourceType::MedicalSchool;
}

impl Protected for MedicalTraining {
    const RESOURCE: ResourceType = ResourceType::MedicalTraining;

    fn owner_physician_id(&self) -> Option<i64> {
        Some(self.physician_id)
    }
}

impl Protected for MedicalCertificate {
    const RESOURCE: ResourceType = ResourceType::MedicalCertificate;

    fn owner_physician_id(&self) -> Option<i64> {
        Some(self.owner_id)
    }
}

impl Protected for Prescription {
    const RESOURCE: ResourceType = ResourceType::Prescription;

    fn owner_physician_id(&self) -> Option<i64> {
        Some(self.physician_id())
    }
}
