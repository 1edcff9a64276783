//! Identity context: who is calling, which roles they hold, and which
//! physician record (if any) their login is linked to.
//!
//! A context is built once per request from the `security_user` tables
//! and is immutable afterwards. Ownership rules compare a record's owning
//! physician against `physician_id`; a login with no linked physician can
//! never satisfy them.

use std::collections::BTreeSet;

use rusqlite::Connection;

use crate::crypto;
use crate::db::{self, DatabaseError};
use crate::models::{Physician, Role, SecurityUser};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    username: String,
    roles: BTreeSet<Role>,
    physician_id: Option<i64>,
}

impl IdentityContext {
    pub fn new(
        username: &str,
        roles: impl IntoIterator<Item = Role>,
        physician_id: Option<i64>,
    ) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
            physician_id,
        }
    }

    pub fn from_user(user: &SecurityUser) -> Self {
        Self {
            username: user.username.clone(),
            roles: user.roles.clone(),
            physician_id: user.physician_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn physician_id(&self) -> Option<i64> {
        self.physician_id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

// ═══════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════

/// Build the context for an already-authenticated username.
pub fn resolve_identity(
    conn: &Connection,
    username: &str,
) -> Result<Option<IdentityContext>, DatabaseError> {
    Ok(db::get_user_by_username(conn, username)?.map(|user| IdentityContext::from_user(&user)))
}

/// Check a username/password pair and build the caller's context.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<IdentityContext, IdentityError> {
    let user = db::get_user_by_username(conn, username)?;
    check_credentials(username, user.as_ref(), password)
}

/// Verify a password against an already-loaded user row. Needs no
/// connection, so callers can run the key derivation outside any lock.
///
/// Unknown users, wrong passwords and unreadable stored hashes all yield
/// `InvalidCredentials` so the caller cannot tell them apart.
pub fn check_credentials(
    username: &str,
    user: Option<&SecurityUser>,
    password: &str,
) -> Result<IdentityContext, IdentityError> {
    let Some(user) = user else {
        tracing::warn!(username, "Authentication failed: unknown user");
        return Err(IdentityError::InvalidCredentials);
    };

    match crypto::verify_password(password, &user.password_hash) {
        Ok(true) => Ok(IdentityContext::from_user(user)),
        Ok(false) => {
            tracing::warn!(username, "Authentication failed: wrong password");
            Err(IdentityError::InvalidCredentials)
        }
        Err(e) => {
            tracing::warn!(username, error = %e, "Authentication failed: stored hash unreadable");
            Err(IdentityError::InvalidCredentials)
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Provisioning
// ═══════════════════════════════════════════════════════════

/// Create a user unless one with this name already exists.
pub fn ensure_user(
    conn: &Connection,
    username: &str,
    password: &str,
    roles: &[Role],
    physician_id: Option<i64>,
) -> Result<SecurityUser, DatabaseError> {
    if let Some(existing) = db::get_user_by_username(conn, username)? {
        return Ok(existing);
    }
    let user = db::insert_security_user(
        conn,
        username,
        &crypto::hash_password(password),
        physician_id,
        roles,
    )?;
    tracing::info!(username, "Security user created");
    Ok(user)
}

/// Login name for a physician: `first.last`, lower-cased, spaces removed.
pub fn physician_username(physician: &Physician) -> String {
    format!("{}.{}", physician.first_name, physician.last_name)
        .to_lowercase()
        .split_whitespace()
        .collect()
}

/// Create a `USER_ROLE` login linked to a newly created physician. The
/// physician id is appended when the plain name is already taken.
pub fn provision_physician_user(
    conn: &Connection,
    physician: &Physician,
    password: &str,
) -> Result<SecurityUser, DatabaseError> {
    let mut username = physician_username(physician);
    if db::get_user_by_username(conn, &username)?.is_some() {
        username = format!("{username}.{}", physician.id);
    }
    let user = db::insert_security_user(
        conn,
        &username,
        &crypto::hash_password(password),
        Some(physician.id),
        &[Role::User],
    )?;
    tracing::info!(username = %user.username, physician_id = physician.id, "Physician login provisioned");
    Ok(user)
}
