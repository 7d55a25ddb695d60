use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => "ok",
        Err(error) => {
            tracing::error!(?error, "database health check failed");
            "unavailable"
        }
    };

    Json(json!({ "status": "ok", "database": database }))
}
