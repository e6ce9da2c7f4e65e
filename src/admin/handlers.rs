use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::accounts::Account;
use crate::admin::dto::{AddStaffRequest, PricingRequest};
use crate::admin::services;
use crate::auth::dto::MessageResponse;
use crate::auth::jwt::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/providers", get(list_providers))
        .route("/admin/service-providers", get(list_service_providers))
        .route("/admin/staff", get(list_staff))
        .route("/admin/approve/:id", put(approve))
        .route("/admin/reject/:id", put(reject))
        .route("/admin/add-staff", post(add_staff))
        .route("/admin/jobs", get(list_jobs))
}

#[instrument(skip(state, _admin))]
pub async fn list_providers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(services::list_providers(&state).await?))
}

/// Same projection as `/providers`; the booking UI fetches it under this
/// name while the moderation queue uses the other.
#[instrument(skip(state, _admin))]
pub async fn list_service_providers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(services::list_providers(&state).await?))
}

#[instrument(skip(state, _admin))]
pub async fn list_staff(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(services::list_staff(&state).await?))
}

#[instrument(skip(state, _admin, payload))]
pub async fn approve(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PricingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let pricing = payload.into_pricing()?;
    services::approve(&state, id, pricing).await?;
    Ok(Json(MessageResponse {
        message: "Provider approved".into(),
    }))
}

#[instrument(skip(state, _admin))]
pub async fn reject(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::reject(&state, id).await?;
    Ok(Json(MessageResponse {
        message: "Provider rejected".into(),
    }))
}

#[instrument(skip(state, _admin, payload))]
pub async fn add_staff(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<AddStaffRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::add_staff(&state, payload).await?;
    Ok(Json(MessageResponse {
        message: "Staff added successfully".into(),
    }))
}

/// Job tracking is not modelled yet; the admin UI expects an empty list.
#[instrument(skip(_admin))]
pub async fn list_jobs(_admin: AdminUser) -> Json<Vec<serde_json::Value>> {
    Json(Vec::new())
}
