//! HTTP API for the Accounts domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AccountsState;
pub use routes::routes;
