mod auth;
mod courses;
mod lessons;

use axum::routing::{get, patch, post, put};
use axum::{Router, extract::State, http::StatusCode, middleware};
use serde::Serialize;

use crate::auth::require_auth;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/courses", get(courses::search).post(courses::create))
        .route(
            "/courses/{id}",
            put(courses::update).delete(courses::soft_delete),
        )
        .route("/courses/{id}/summary", get(courses::summary))
        .route("/courses/{id}/publish", patch(courses::publish))
        .route("/courses/{id}/unpublish", patch(courses::unpublish))
        .route(
            "/courses/{id}/lessons",
            get(lessons::get_by_course).post(lessons::create),
        )
        .route(
            "/lessons/{id}",
            put(lessons::update).delete(lessons::soft_delete),
        )
        .route("/lessons/{id}/move-up", patch(lessons::move_up))
        .route("/lessons/{id}/move-down", patch(lessons::move_down))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
