//! Authentication configuration

use pha_common::Config;

/// Default token lifetime: one week
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// Config with only a signing secret and the default lifetime
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: None,
            audience: None,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            token_ttl_hours: config.jwt_ttl_hours,
        }
    }
}
