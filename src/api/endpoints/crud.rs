//! Generic handlers for resources addressed by a numeric id.
//!
//! - `GET /api/v1/<resource>` — list
//! - `POST /api/v1/<resource>` — create
//! - `GET|PUT|DELETE /api/v1/<resource>/:id` — read, update, delete

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity::IdentityContext;
use crate::service::Protected;

pub async fn list<E>(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<Vec<E>>, ApiError>
where
    E: Protected + Serialize,
{
    Ok(Json(ctx.service.list::<E>(&identity)?))
}

pub async fn read<E>(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<E>, ApiError>
where
    E: Protected<Key = i64> + Serialize,
{
    let Path(id) = id?;
    Ok(Json(ctx.service.read::<E>(&identity, id)?))
}

pub async fn create<E>(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    payload: Result<Json<E::Draft>, JsonRejection>,
) -> Result<Json<E>, ApiError>
where
    E: Protected + Serialize,
    E::Draft: DeserializeOwned,
{
    let Json(draft) = payload?;
    Ok(Json(ctx.service.create::<E>(&identity, &draft)?))
}

pub async fn update<E>(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<E::Draft>, JsonRejection>,
) -> Result<Json<E>, ApiError>
where
    E: Protected<Key = i64> + Serialize,
    E::Draft: DeserializeOwned,
{
    let Path(id) = id?;
    let Json(draft) = payload?;
    Ok(Json(ctx.service.update::<E>(&identity, id, &draft)?))
}

pub async fn delete<E>(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<IdentityContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<E>, ApiError>
where
    E: Protected<Key = i64> + Serialize,
{
    let Path(id) = id?;
    Ok(Json(ctx.service.delete::<E>(&identity, id)?))
}
