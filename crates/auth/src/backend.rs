//! Concrete authentication backend
//!
//! Tokens are self-contained: validation checks signature, expiry and the
//! optional issuer/audience, then builds an `AuthContext` from the claims
//! without touching the database.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::claims::TokenClaims;
use crate::config::AuthConfig;
use crate::context::{AuthContext, AuthIdentity};
use crate::error::AuthError;

/// A freshly signed bearer token
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Sign a token for the given user, valid for `token_ttl_hours`
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(self.config.token_ttl_hours);

        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp().max(0) as u64,
            exp: expires_at.timestamp().max(0) as u64,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = crate::jwt::encode_jwt_token(&claims, &self.config)?;

        tracing::debug!(user_id = %user_id, expires_at = %expires_at, "Issued access token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a raw bearer token and build the caller's context
    pub fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        Ok(AuthContext::new(AuthIdentity {
            id: user_id,
            email: claims.email,
        }))
    }
}
