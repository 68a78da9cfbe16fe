use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub schedules: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let schedules = state.schedules.read().await.len();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        schedules,
    })
}
