//! Authorization context for authenticated users

use serde::Serialize;
use uuid::Uuid;

/// Identity carried by a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
}

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }
}

