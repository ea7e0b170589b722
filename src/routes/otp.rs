use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::dto::otp_dto::{SendOtpPayload, VerifyOtpPayload};
use crate::error::Result;
use crate::AppState;

pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.otp_service.send(&payload.email).await?;
    Ok(Json(json!({ "message": "Email sent successfully" })))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .otp_service
        .verify(&payload.email, &payload.code)
        .await?;
    Ok(Json(json!({ "message": "Email verified successfully" })))
}
