//! Authentication for the PHA API
//!
//! Provides Argon2 password hashing, HS256 bearer token issue/validation,
//! and an axum extractor that works with any domain state implementing
//! `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod password;

pub use backend::{AuthBackend, IssuedToken};
pub use claims::TokenClaims;
pub use config::AuthConfig;
pub use context::{AuthContext, AuthIdentity};
pub use error::AuthError;
pub use extractors::AuthUser;
pub use password::{hash_password, verify_password};
