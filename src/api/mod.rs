//! HTTP surface.
//!
//! Resources are nested under `/api/v1/` and protected by a middleware
//! stack: Auth → Audit → Handler. Every response carries
//! `Cache-Control: no-store`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
