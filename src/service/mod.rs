//! Access-controlled service: the single entry point that combines the
//! identity context, the authorization engine and the entity graph.
//!
//! Every operation runs inside one SQLite transaction while holding the
//! connection lock, so a read-decide-write sequence is never interleaved
//! with another write.

mod error;
mod protected;

pub use error::ServiceError;
pub use protected::Protected;

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::authorization::{self, Operation, ResourceType};
use crate::db::{self, DatabaseError};
use crate::identity::{self, IdentityContext};
use crate::models::{Prescription, PrescriptionDraft, PrescriptionKey, Role, SecurityUser};

/// Runtime switches for the service.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    /// When set, creating a physician also creates a linked login with
    /// this password.
    pub physician_user_password: Option<String>,
}

pub struct MedicalService {
    conn: Mutex<Connection>,
    options: ServiceOptions,
}

impl MedicalService {
    pub fn new(conn: Connection, options: ServiceOptions) -> Self {
        Self {
            conn: Mutex::new(conn),
            options,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ServiceError> {
        self.conn
            .lock()
            .map_err(|_| ServiceError::Internal("connection lock poisoned".into()))
    }

    /// Run `f` in a transaction; commit on `Ok`, roll back on `Err`.
    fn transaction<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(DatabaseError::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(DatabaseError::from)?;
        Ok(out)
    }

    // ── Identity ────────────────────────────────────────────

    /// Authenticate a caller. The key derivation runs after the connection
    /// lock is released.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IdentityContext, ServiceError> {
        let user = {
            let conn = self.lock()?;
            db::get_user_by_username(&conn, username)?
        };
        Ok(identity::check_credentials(username, user.as_ref(), password)?)
    }

    pub fn ensure_user(
        &self,
        username: &str,
        password: &str,
        roles: &[Role],
        physician_id: Option<i64>,
    ) -> Result<SecurityUser, ServiceError> {
        self.transaction(|conn| {
            Ok(identity::ensure_user(conn, username, password, roles, physician_id)?)
        })
    }

    // ── Generic operations ──────────────────────────────────

    pub fn list<E: Protected>(&self, ctx: &IdentityContext) -> Result<Vec<E>, ServiceError> {
        tracing::debug!(resource = %E::RESOURCE, principal = ctx.username(), "list");
        authorize(Operation::ListAll, E::RESOURCE, None, ctx)?;
        self.transaction(|conn| Ok(E::list(conn)?))
    }

    pub fn read<E: Protected>(
        &self,
        ctx: &IdentityContext,
        key: E::Key,
    ) -> Result<E, ServiceError> {
        tracing::debug!(resource = %E::RESOURCE, %key, principal = ctx.username(), "read");
        self.transaction(|conn| {
            let entity = load::<E>(conn, key)?;
            authorize(Operation::ReadOne, E::RESOURCE, entity.owner_physician_id(), ctx)?;
            Ok(entity)
        })
    }

    pub fn create<E: Protected>(
        &self,
        ctx: &IdentityContext,
        draft: &E::Draft,
    ) -> Result<E, ServiceError> {
        tracing::debug!(resource = %E::RESOURCE, principal = ctx.username(), "create");
        authorize(Operation::Create, E::RESOURCE, None, ctx)?;
        let created = self.transaction(|conn| {
            let entity = E::insert(conn, draft)?;
            entity.after_create(conn, &self.options)?;
            Ok(entity)
        })?;
        tracing::info!(resource = %E::RESOURCE, key = %created.key(), principal = ctx.username(), "Created");
        Ok(created)
    }

    pub fn update<E: Protected>(
        &self,
        ctx: &IdentityContext,
        key: E::Key,
        draft: &E::Draft,
    ) -> Result<E, ServiceError> {
        tracing::debug!(resource = %E::RESOURCE, %key, principal = ctx.username(), "update");
        let updated = self.transaction(|conn| {
            let existing = load::<E>(conn, key)?;
            authorize(Operation::Update, E::RESOURCE, existing.owner_physician_id(), ctx)?;
            Ok(E::update(conn, &existing, draft)?)
        })?;
        tracing::info!(resource = %E::RESOURCE, from = %key, to = %updated.key(), principal = ctx.username(), "Updated");
        Ok(updated)
    }

    /// Delete an instance and its dependents; returns the deleted instance.
    pub fn delete<E: Protected>(
        &self,
        ctx: &IdentityContext,
        key: E::Key,
    ) -> Result<E, ServiceError> {
        tracing::debug!(resource = %E::RESOURCE, %key, principal = ctx.username(), "delete");
        let deleted = self.transaction(|conn| {
            let existing = load::<E>(conn, key)?;
            authorize(Operation::Delete, E::RESOURCE, existing.owner_physician_id(), ctx)?;
            E::delete(conn, key)?;
            Ok(existing)
        })?;
        tracing::info!(resource = %E::RESOURCE, %key, principal = ctx.username(), "Deleted");
        Ok(deleted)
    }

    // ── Prescriptions ───────────────────────────────────────

    /// Create a prescription addressed by its key, with the medicine id
    /// supplied alongside rather than inside the payload. Ids in the
    /// payload are overridden.
    pub fn create_prescription(
        &self,
        ctx: &IdentityContext,
        key: PrescriptionKey,
        medicine_id: i64,
        draft: &PrescriptionDraft,
    ) -> Result<Prescription, ServiceError> {
        let draft = PrescriptionDraft {
            physician_id: Some(key.physician_id),
            patient_id: Some(key.patient_id),
            medicine_id: Some(medicine_id),
            ..draft.clone()
        };
        self.create::<Prescription>(ctx, &draft)
    }
}

fn load<E: Protected>(conn: &Connection, key: E::Key) -> Result<E, ServiceError> {
    E::get(conn, key)?.ok_or_else(|| ServiceError::not_found(E::RESOURCE, key))
}

fn authorize(
    operation: Operation,
    resource: ResourceType,
    owner_physician_id: Option<i64>,
    ctx: &IdentityContext,
) -> Result<(), ServiceError> {
    let decision = authorization::decide(operation, resource, owner_physician_id, ctx);
    if decision.allowed {
        return Ok(());
    }
    tracing::warn!(
        %resource,
        %operation,
        principal = ctx.username(),
        mode = ?decision.mode,
        "Access denied"
    );
    Err(ServiceError::Forbidden {
        resource,
        operation,
    })
}
