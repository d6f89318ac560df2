//! Route definitions for Accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, profile};
use super::middleware::AccountsState;

/// Registration and login (unauthenticated)
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
}

fn profile_routes() -> Router<AccountsState> {
    Router::new().route(
        "/v1/profile",
        get(profile::get_profile).put(profile::update_profile),
    )
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(profile_routes())
}
