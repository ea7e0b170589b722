use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::dto::event_dto::{DeregisterQuery, RegisterPayload};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn list_webinars(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let webinars = state.event_service.list_webinars().await?;
    Ok(Json(json!({ "webinars": webinars })))
}

pub async fn get_webinar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state
        .event_service
        .webinar_detail(id, claims.email())
        .await?;
    Ok(Json(json!({ "webinar": detail })))
}

pub async fn register_for_webinar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let receipt = state
        .event_service
        .register_for_webinar(id, claims.email(), &payload.email)
        .await?;
    Ok(Json(receipt))
}

pub async fn deregister_from_webinar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeregisterQuery>,
) -> Result<impl IntoResponse> {
    let receipt = state
        .event_service
        .deregister_from_webinar(id, claims.email(), &query.email)
        .await?;
    Ok(Json(receipt))
}
