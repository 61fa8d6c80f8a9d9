//! API endpoints.

mod admin;
mod memes;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/vote", votes::router())
        .nest("/memes", memes::router())
}
