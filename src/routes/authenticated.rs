use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes open to any signed-in user. `create_router` wraps this router in the auth middleware
/// layer, and every handler also takes `AuthUser` to know who is acting.
///
/// Editing a competition and recording scores only require a signed-in user, while creating
/// and deleting competitions are admin-only (see `admin`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /competitions
        // Lists every competition with its author, earliest deadline first.
        .route("/competitions", get(handlers::list_competitions))
        // POST /competitions/edit
        // Edit form submission; redirects to the list on success.
        .route("/competitions/edit", post(handlers::update_competition))
        // GET /competitions/apply/{id}
        // Applies the caller to a competition (once) and notifies the inbox.
        .route("/competitions/apply/{id}", get(handlers::apply))
        // POST /competitions/scoreUpdate/{id}
        // Sets an application's score and redirects to the scoreboard.
        .route("/competitions/scoreUpdate/{id}", post(handlers::update_score))
}
