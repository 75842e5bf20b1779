use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::JwtService;
use crate::error::AppError;
use crate::state::AppState;

/// Verified caller identity, injected into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Authentication gate for the course/lesson routes: extracts the bearer
/// token, verifies it, and injects [`AuthUser`]. Public routes (health,
/// register, login) are simply not nested under this layer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = header
        .and_then(JwtService::extract_from_header)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token."))?;

    let claims = state.jwt.verify(token)?;
    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}
