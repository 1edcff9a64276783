use std::collections::BTreeSet;

use serde::Serialize;

use super::enums::Role;

/// A login principal. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityUser {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub physician_id: Option<i64>,
    pub roles: BTreeSet<Role>,
}

impl SecurityUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
