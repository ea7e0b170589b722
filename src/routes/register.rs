use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::dto::user_dto::{AvailabilityQuery, AvailabilityResponse, RegisterUserPayload};
use crate::error::{Error, Result};
use crate::AppState;

pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse> {
    if query.username.is_none() && query.email.is_none() {
        return Err(Error::BadRequest(
            "Please provide 'username' or 'email' to check".to_string(),
        ));
    }

    let username_exists = match &query.username {
        Some(username) => Some(state.profile_service.username_exists(username).await?),
        None => None,
    };
    let email_exists = match &query.email {
        Some(email) => Some(state.profile_service.email_exists(email).await?),
        None => None,
    };

    Ok(Json(AvailabilityResponse {
        username_exists,
        email_exists,
    }))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.profile_service.register_user(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "status": "success",
        })),
    ))
}
