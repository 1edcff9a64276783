//! Authorization engine: a fixed policy table plus a pure decision function.
//!
//! Each (resource, operation) pair maps to one of three access modes:
//! 1. `AdminOnly` → allow iff the caller holds `ADMIN_ROLE`
//! 2. `AdminOrUser` → allow iff the caller holds `ADMIN_ROLE` or `USER_ROLE`
//! 3. `AdminOrOwner` → allow for administrators, otherwise iff the caller's
//!    linked physician id equals the instance's owning physician id
//!
//! Default-deny. `decide` performs no I/O; for `AdminOrOwner` the caller
//! must load the instance first and pass its owner in.

use std::fmt;

use crate::identity::IdentityContext;
use crate::models::Role;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListAll,
    ReadOne,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Physician,
    Patient,
    Medicine,
    MedicalSchool,
    MedicalTraining,
    MedicalCertificate,
    Prescription,
}

impl ResourceType {
    pub const ALL: [ResourceType; 7] = [
        Self::Physician,
        Self::Patient,
        Self::Medicine,
        Self::MedicalSchool,
        Self::MedicalTraining,
        Self::MedicalCertificate,
        Self::Prescription,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physician => "Physician",
            Self::Patient => "Patient",
            Self::Medicine => "Medicine",
            Self::MedicalSchool => "MedicalSchool",
            Self::MedicalTraining => "MedicalTraining",
            Self::MedicalCertificate => "MedicalCertificate",
            Self::Prescription => "Prescription",
        }
    }
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::ListAll,
        Self::ReadOne,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    AdminOnly,
    AdminOrUser,
    AdminOrOwner,
}

/// Why access was granted (or denied), for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Caller holds the administrator role.
    Administrator,
    /// Caller holds the user role and the policy admits any user.
    User,
    /// Caller's linked physician owns the instance.
    Owner,
    /// No matching rule.
    Denied,
}

/// Result of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub mode: AccessMode,
    pub reason: AccessReason,
}

impl AccessDecision {
    fn allow(mode: AccessMode, reason: AccessReason) -> Self {
        Self {
            allowed: true,
            mode,
            reason,
        }
    }

    fn deny(mode: AccessMode) -> Self {
        Self {
            allowed: false,
            mode,
            reason: AccessReason::Denied,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Policy table
// ═══════════════════════════════════════════════════════════

/// The access mode guarding `operation` on `resource`.
pub fn policy(resource: ResourceType, operation: Operation) -> AccessMode {
    use AccessMode::*;
    use Operation::*;
    use ResourceType::*;

    match (resource, operation) {
        (Physician, ReadOne) => AdminOrOwner,
        (Physician, _) => AdminOnly,

        (Patient, ListAll | ReadOne | Create) => AdminOrUser,
        (Patient, Update | Delete) => AdminOnly,

        (Medicine | MedicalSchool | MedicalTraining, ListAll | ReadOne) => AdminOrUser,
        (Medicine | MedicalSchool | MedicalTraining, Create | Update | Delete) => AdminOnly,

        (MedicalCertificate, ReadOne) => AdminOrOwner,
        (MedicalCertificate, _) => AdminOnly,

        (Prescription, _) => AdminOnly,
    }
}

// ═══════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════

/// Decide whether `ctx` may perform `operation` on `resource`.
///
/// `owner_physician_id` is the owning physician of the addressed instance;
/// it is only consulted under `AdminOrOwner` and `None` there always denies
/// non-administrators.
pub fn decide(
    operation: Operation,
    resource: ResourceType,
    owner_physician_id: Option<i64>,
    ctx: &IdentityContext,
) -> AccessDecision {
    let mode = policy(resource, operation);

    if ctx.has_role(Role::Admin) {
        return AccessDecision::allow(mode, AccessReason::Administrator);
    }

    match mode {
        AccessMode::AdminOnly => AccessDecision::deny(mode),
        AccessMode::AdminOrUser if ctx.has_role(Role::User) => {
            AccessDecision::allow(mode, AccessReason::User)
        }
        AccessMode::AdminOrUser => AccessDecision::deny(mode),
        AccessMode::AdminOrOwner => match (ctx.physician_id(), owner_physician_id) {
            (Some(mine), Some(owner)) if mine == owner => {
                AccessDecision::allow(mode, AccessReason::Owner)
            }
            _ => AccessDecision::deny(mode),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> IdentityContext {
        IdentityContext::new("admin", [Role::Admin], None)
    }

    fn user(physician_id: Option<i64>) -> IdentityContext {
        IdentityContext::new("cst8288", [Role::User], physician_id)
    }

    fn nobody(physician_id: Option<i64>) -> IdentityContext {
        IdentityContext::new("nobody", Vec::<Role>::new(), physician_id)
    }

    #[test]
    fn empty_roles_denied_for_role_policies() {
        let ctx = nobody(Some(1));
        for resource in ResourceType::ALL {
            for op in Operation::ALL {
                if policy(resource, op) == AccessMode::AdminOrOwner {
                    continue;
                }
                assert!(
                    !decide(op, resource, Some(1), &ctx).allowed,
                    "{op} on {resource} should be denied"
                );
            }
        }
    }

    #[test]
    fn owner_rule_never_allows_unlinked_user() {
        let ctx = user(None);
        for resource in ResourceType::ALL {
            for op in Operation::ALL {
                if policy(resource, op) != AccessMode::AdminOrOwner {
                    continue;
                }
                assert!(!decide(op, resource, Some(5), &ctx).allowed);
                assert!(!decide(op, resource, None, &ctx).allowed);
            }
        }
    }

    #[test]
    fn admin_allowed_everywhere() {
        let ctx = admin();
        for resource in ResourceType::ALL {
            for op in Operation::ALL {
                let decision = decide(op, resource, None, &ctx);
                assert!(decision.allowed);
                assert_eq!(decision.reason, AccessReason::Administrator);
            }
        }
    }

    #[test]
    fn unlinked_user_cannot_read_foreign_certificate() {
        let decision = decide(
            Operation::ReadOne,
            ResourceType::MedicalCertificate,
            Some(5),
            &user(None),
        );
        assert!(!decision.allowed);
        assert_eq!(decision.reason, AccessReason::Denied);
    }

    #[test]
    fn linked_user_reads_own_certificate() {
        let decision = decide(
            Operation::ReadOne,
            ResourceType::MedicalCertificate,
            Some(1),
            &user(Some(1)),
        );
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::Owner);
    }

    #[test]
    fn linked_user_cannot_read_other_physicians_certificate() {
        let decision = decide(
            Operation::ReadOne,
            ResourceType::MedicalCertificate,
            Some(2),
            &user(Some(1)),
        );
        assert!(!decision.allowed);
    }

    #[test]
    fn physician_reads_self_only() {
        let ctx = user(Some(3));
        assert!(decide(Operation::ReadOne, ResourceType::Physician, Some(3), &ctx).allowed);
        assert!(!decide(Operation::ReadOne, ResourceType::Physician, Some(4), &ctx).allowed);
        assert!(!decide(Operation::ListAll, ResourceType::Physician, None, &ctx).allowed);
    }

    #[test]
    fn user_role_table() {
        let ctx = user(Some(1));
        assert!(decide(Operation::ListAll, ResourceType::Patient, None, &ctx).allowed);
        assert!(decide(Operation::Create, ResourceType::Patient, None, &ctx).allowed);
        assert!(!decide(Operation::Delete, ResourceType::Patient, None, &ctx).allowed);
        assert!(!decide(Operation::Update, ResourceType::Patient, None, &ctx).allowed);

        assert!(decide(Operation::ReadOne, ResourceType::Medicine, None, &ctx).allowed);
        assert!(!decide(Operation::Create, ResourceType::Medicine, None, &ctx).allowed);

        assert!(decide(Operation::ListAll, ResourceType::MedicalSchool, None, &ctx).allowed);
        assert!(!decide(Operation::Create, ResourceType::MedicalSchool, None, &ctx).allowed);

        assert!(decide(Operation::ReadOne, ResourceType::MedicalTraining, None, &ctx).allowed);
        assert!(!decide(Operation::Update, ResourceType::MedicalTraining, None, &ctx).allowed);

        assert!(!decide(Operation::ListAll, ResourceType::MedicalCertificate, None, &ctx).allowed);
    }

    #[test]
    fn prescriptions_are_admin_only() {
        let ctx = user(Some(1));
        for op in Operation::ALL {
            assert_eq!(policy(ResourceType::Prescription, op), AccessMode::AdminOnly);
            assert!(!decide(op, ResourceType::Prescription, Some(1), &ctx).allowed);
        }
    }

    #[test]
    fn decide_is_deterministic() {
        let ctx = user(Some(7));
        let first = decide(Operation::ReadOne, ResourceType::MedicalCertificate, Some(7), &ctx);
        let second = decide(Operation::ReadOne, ResourceType::MedicalCertificate, Some(7), &ctx);
        assert_eq!(first, second);
    }
}
