pub mod fencers;
pub mod head_to_head;
pub mod matches;
pub mod rankings;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub matches: usize,
    pub rankings: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        matches: state.dataset.matches.len(),
        rankings: state.dataset.rankings.len(),
    })
}
