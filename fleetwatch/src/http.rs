//! On-demand trigger endpoint.

use axum::{extract::State, routing::get, Router};

use crate::state::AppState;

pub const CHECKHEALTH_BODY: &str = "Health check completed. Check logs for details.";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/checkhealth", get(checkhealth_handler))
        .with_state(state)
}

// Runs a full health pass before answering; no timeout beyond the per-command one.
pub async fn checkhealth_handler(State(state): State<AppState>) -> &'static str {
    state.monitor.check_health().await;
    CHECKHEALTH_BODY
}
