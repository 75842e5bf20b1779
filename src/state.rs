use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt: Arc<JwtService>,
}
