//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Auth validator: HTTP Basic credentials → `IdentityContext`
//! 2. Audit logger: logs after auth, has the principal

pub mod audit;
pub mod auth;
