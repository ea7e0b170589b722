use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use validator::Validate;

use crate::dto::user_dto::{ProfileQuery, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::AppState;

// Profiles are readable and writable by their owner only.
fn check_owner(claims: &Claims, email: &str) -> Result<()> {
    if claims.email() != email {
        return Err(Error::Forbidden(
            "Cannot access another student's profile".to_string(),
        ));
    }
    Ok(())
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ProfileQuery>,
) -> Result<impl IntoResponse> {
    check_owner(&claims, &query.email)?;
    let user = state.profile_service.get_by_email(&query.email).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .profile_service
        .update_profile(claims.email(), payload)
        .await?;
    Ok(Json(json!({ "user": user })))
}
