//! API endpoint handlers.
//!
//! `crud` serves every id-addressed resource generically; prescriptions
//! are addressed by their (physician, patient) pair.

pub mod crud;
pub mod health;
pub mod prescriptions;

use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::api::error::ApiError;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
