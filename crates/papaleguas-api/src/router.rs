use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{self, AppState};
use crate::contact;
use crate::middleware::require_auth;
use crate::session;
use crate::timeline;

/// All `/api` routes behind the session layer. Transport layers (CORS,
/// tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/timeline", get(timeline::list_entries))
        .route("/api/timeline/{id}", get(timeline::get_entry))
        .route("/api/contact", post(contact::submit))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/timeline", post(timeline::create_entry))
        .route("/api/timeline/{id}", put(timeline::update_entry).delete(timeline::delete_entry))
        .route("/api/contact", get(contact::list))
        .layer(middleware::from_fn(require_auth))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(session::layer(&state.session_config))
}
