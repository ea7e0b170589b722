use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::dto::job_dto::{SubmitApplicationPayload, UpdateStatusPayload, WithdrawQuery};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn list_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list().await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.job_service.detail(id, claims.email()).await?;
    Ok(Json(json!({ "job": detail })))
}

pub async fn apply_to_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    let receipt = state
        .job_service
        .submit_application(id, claims.email(), payload)
        .await?;
    Ok(Json(receipt))
}

pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(query): Query<WithdrawQuery>,
) -> Result<impl IntoResponse> {
    let receipt = state
        .job_service
        .withdraw_application(id, claims.email(), &query.email)
        .await?;
    Ok(Json(receipt))
}

pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    state
        .job_service
        .update_application_status(id, &payload.application_email, payload.new_status)
        .await?;
    Ok(Json(json!({
        "message": "Application status updated successfully",
        "new_status": payload.new_status,
    })))
}
