use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without any identity. Both result views are meant to be shared (or
/// printed and pinned to a wall), so they stay open.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe.
        .route("/health", get(|| async { "ok" }))
        // GET /competitions/score/{id}
        // Scoreboard of one competition, ascending by score.
        .route("/competitions/score/{id}", get(handlers::scoreboard))
        // GET /competitions/printLayout/{id}
        // Print-oriented results, descending by score.
        .route("/competitions/printLayout/{id}", get(handlers::print_layout))
}
