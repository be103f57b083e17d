//! Account endpoints: register, login, update-profile
//!
//! Request bodies are deserialized with every field optional so that a missing field is
//! reported as a 400 in the usual JSON error shape rather than as an extractor rejection.
//! An empty string counts as missing.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::api::error::ApiError;
use crate::db::ProfileUpdate;
use crate::services::{PublicUser, RegisterInput};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub current_username: Option<String>,
    pub new_username: Option<String>,
    pub new_profile_pic: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

impl From<PublicUser> for UserPayload {
    fn from(user: PublicUser) -> Self {
        Self {
            username: user.username,
            profile_pic: user.profile_pic_base64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub user: UserPayload,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub user: UserPayload,
}

/// Treat `""` like an absent field
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an account
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = payload?;

    let (Some(username), Some(password), Some(profile_pic)) = (
        present(body.username),
        present(body.password),
        present(body.profile_pic),
    ) else {
        return Err(ApiError::missing_fields());
    };

    state
        .accounts
        .register(RegisterInput {
            username,
            password,
            profile_pic_base64: profile_pic,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            status: "success",
            message: "User registered successfully.",
        }),
    ))
}

/// Verify credentials and return the profile
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = payload?;

    let (Some(username), Some(password)) = (present(body.username), present(body.password))
    else {
        return Err(ApiError::missing_fields());
    };

    let user = state.accounts.login(&username, &password).await?;

    Ok(Json(LoginResponse {
        status: "success",
        user: user.into(),
    }))
}

/// Rename the user identified by `currentUsername`, optionally replacing the picture
async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let Json(body) = payload?;

    let (Some(current_username), Some(new_username)) =
        (present(body.current_username), present(body.new_username))
    else {
        return Err(ApiError::missing_fields());
    };

    let update = ProfileUpdate::new(new_username, present(body.new_profile_pic));
    let user = state
        .accounts
        .update_profile(&current_username, update)
        .await?;

    Ok(Json(UpdateProfileResponse {
        status: "success",
        message: "Profile updated successfully.",
        user: user.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update-profile", post(update_profile))
}
