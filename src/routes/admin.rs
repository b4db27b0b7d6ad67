use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Competition management. Every handler here takes `AdminUser`, which rejects anonymous
/// callers with 401 and non-admins with 403 before the handler body runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /competitions/delete/{id}
        // Deletes a competition and its applications, then redirects to the list.
        .route("/competitions/delete/{id}", get(handlers::delete_competition))
        // GET /competitions/edit/{id}
        // The form prefilled with an existing competition.
        .route("/competitions/edit/{id}", get(handlers::edit_form))
        // GET/POST /competitions/add
        // Empty form, and its submission.
        .route(
            "/competitions/add",
            get(handlers::add_form).post(handlers::create_competition),
        )
}
