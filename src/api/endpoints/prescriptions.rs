//! Prescription endpoints, addressed by `:physician_id/:patient_id`.
//!
//! - `GET /api/v1/prescription` — list
//! - `GET|PUT|DELETE /api/v1/prescription/:physician_id/:patient_id`
//! - `POST /api/v1/prescription/:physician_id/:patient_id/:medicine_id` — create

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity::IdentityContext;
use crate::models::{Prescription, PrescriptionDraft, PrescriptionKey};

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    Ok(Json(ctx.service.list::<Prescription>(&identity)?))
}

pub async fn read(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    key: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let Path((physician_id, patient_id)) = key?;
    let key = PrescriptionKey::new(physician_id, patient_id);
    Ok(Json(ctx.service.read::<Prescription>(&identity, key)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    ids: Result<Path<(i64, i64, i64)>, PathRejection>,
    payload: Result<Json<PrescriptionDraft>, JsonRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let Path((physician_id, patient_id, medicine_id)) = ids?;
    let Json(draft) = payload?;
    let key = PrescriptionKey::new(physician_id, patient_id);
    Ok(Json(ctx.service.create_prescription(&identity, key, medicine_id, &draft)?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    key: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<PrescriptionDraft>, JsonRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let Path((physician_id, patient_id)) = key?;
    let Json(draft) = payload?;
    let key = PrescriptionKey::new(physician_id, patient_id);
    Ok(Json(ctx.service.update::<Prescription>(&identity, key, &draft)?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    key: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let Path((physician_id, patient_id)) = key?;
    let key = PrescriptionKey::new(physician_id, patient_id);
    Ok(Json(ctx.service.delete::<Prescription>(&identity, key)?))
}
