//! Accounts domain: users, credentials, profiles

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{normalize_email, Profile, ProfileChanges, User, DEFAULT_LANGUAGE};

// Re-export repository types
pub use repository::{AccountsRepositories, ProfileRepository, UserRepository};

// Re-export API types
pub use api::routes;
pub use api::AccountsState;
