use std::collections::BTreeSet;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

const USER_COLUMNS: &str = "user_id, username, password_hash, physician_id";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<SecurityUser> {
    Ok(SecurityUser {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        physician_id: row.get(3)?,
        roles: BTreeSet::new(),
    })
}

/// Role names granted to a user. Names this build does not know are
/// skipped rather than failing the whole lookup.
fn load_roles(conn: &Connection, user_id: i64) -> Result<BTreeSet<Role>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.name FROM security_role r
         JOIN user_has_role ur ON ur.role_id = r.role_id
         WHERE ur.user_id = ?1",
    )?;
    let names = stmt
        .query_map(params![user_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut roles = BTreeSet::new();
    for name in names {
        match Role::from_str(&name) {
            Ok(role) => {
                roles.insert(role);
            }
            Err(_) => tracing::warn!(user_id, role = %name, "Ignoring unknown role"),
        }
    }
    Ok(roles)
}

fn with_roles(
    conn: &Connection,
    user: Option<SecurityUser>,
) -> Result<Option<SecurityUser>, DatabaseError> {
    match user {
        Some(mut user) => {
            user.roles = load_roles(conn, user.id)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

pub fn insert_security_user(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    physician_id: Option<i64>,
    roles: &[Role],
) -> Result<SecurityUser, DatabaseError> {
    conn.execute(
        "INSERT INTO security_user (username, password_hash, physician_id) VALUES (?1, ?2, ?3)",
        params![username, password_hash, physician_id],
    )?;
    let user_id = conn.last_insert_rowid();
    for role in roles {
        grant_role(conn, user_id, *role)?;
    }
    Ok(SecurityUser {
        id: user_id,
        username: username.into(),
        password_hash: password_hash.into(),
        physician_id,
        roles: roles.iter().copied().collect(),
    })
}

pub fn grant_role(conn: &Connection, user_id: i64, role: Role) -> Result<(), DatabaseError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO user_has_role (user_id, role_id)
         SELECT ?1, role_id FROM security_role WHERE name = ?2",
        params![user_id, role.as_str()],
    )?;
    if inserted == 0 && !load_roles(conn, user_id)?.contains(&role) {
        return Err(DatabaseError::not_found("SecurityRole", role));
    }
    Ok(())
}

pub fn get_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<SecurityUser>, DatabaseError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM security_user WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()?;
    with_roles(conn, user)
}

pub fn get_user_by_physician(
    conn: &Connection,
    physician_id: i64,
) -> Result<Option<SecurityUser>, DatabaseError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM security_user WHERE physician_id = ?1"),
            params![physician_id],
            user_from_row,
        )
        .optional()?;
    with_roles(conn, user)
}

/// Point a user at a physician, or clear the link with `None`.
pub fn link_user_to_physician(
    conn: &Connection,
    user_id: i64,
    physician_id: Option<i64>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE security_user SET physician_id = ?1 WHERE user_id = ?2",
        params![physician_id, user_id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("SecurityUser", user_id));
    }
    Ok(())
}
