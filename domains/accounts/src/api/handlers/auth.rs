//! Registration and login handlers
//!
//! - POST /v1/auth/register - Create a user and its profile
//! - POST /v1/auth/login - Exchange credentials for a bearer token

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use pha_auth::{hash_password, verify_password};
use pha_common::{Error, RepositoryError, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::{normalize_email, Profile, User};
use crate::repository::transactions::{create_profile_tx, create_user_tx};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Request for registering a new account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    /// Plain-text password (8-128 chars)
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Request for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: LoginUser,
}

/// Register a new account
pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let email = normalize_email(&req.email);

    if state.repos.users.find_by_email(&email).await?.is_some() {
        return Err(Error::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = User::new(email, password_hash)?;
    let profile = Profile::for_new_user(&user);

    let mut transaction = state.repos.pool().begin().await?;

    // A concurrent registration can still win between the check and the insert
    let created = create_user_tx(&mut transaction, &user)
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyExists => Error::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;
    create_profile_tx(&mut transaction, &profile).await?;

    transaction.commit().await?;

    tracing::info!(user_id = %created.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: created.id,
        }),
    ))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = normalize_email(&req.email);

    let user = match state.repos.users.find_by_email(&email).await? {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            tracing::info!("Login rejected");
            return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
        }
    };

    let issued = state.auth.issue_token(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: LoginUser {
            id: user.id,
            email: user.email,
        },
    }))
}
