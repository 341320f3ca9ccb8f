pub mod analytics;
pub mod seed;

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{
    database::{self, Database},
    error::AppError,
};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub seed_user_count: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    database::ping(&state.db).await?;
    Ok(Json(json!({ "status": "ok" })))
}
