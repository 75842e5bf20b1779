use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::db::repository;
use crate::error::AppError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, User};
use crate::services::lesson_service::unique_violation_to_conflict;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "Email already registered.";
const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::validation("Email is required."));
    }
    if req.password.chars().count() < 8 {
        return Err(AppError::validation("Password must be at least 8 characters."));
    }

    if repository::find_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::conflict(DUPLICATE_EMAIL));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        lastname: req.lastname.trim().to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        created_at: Utc::now().to_rfc3339(),
    };

    // The unique email index backstops a concurrent registration race.
    repository::insert_user(&state.db, &user)
        .await
        .map_err(|e| unique_violation_to_conflict(e, DUPLICATE_EMAIL))?;

    Ok(Json(MessageResponse {
        message: "User created.".to_string(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = repository::find_user_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.jwt.issue(&user.id, &user.email)?;
    Ok(Json(TokenResponse { token }))
}
