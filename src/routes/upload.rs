use axum::{extract::State, response::IntoResponse, Json};

use crate::dto::upload_dto::SignUploadPayload;
use crate::error::Result;
use crate::AppState;

pub async fn sign_resume_upload(
    State(state): State<AppState>,
    Json(payload): Json<SignUploadPayload>,
) -> Result<impl IntoResponse> {
    let signed = state.upload_service.sign(payload);
    Ok(Json(signed))
}
