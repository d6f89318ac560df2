//! Profile handlers
//!
//! - GET /v1/profile - The caller's profile
//! - PUT /v1/profile - Partial update of the caller's profile

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use pha_auth::AuthUser;
use pha_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::{Profile, ProfileChanges};

/// Profile response DTO
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub language: String,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    fn new(profile: Profile, email: String) -> Self {
        Self {
            user_id: profile.user_id,
            email,
            display_name: profile.display_name,
            age: profile.age,
            gender: profile.gender,
            language: profile.language,
            bio: profile.bio,
            updated_at: profile.updated_at,
        }
    }
}

/// Request for updating the profile; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,

    #[validate(length(max = 32))]
    pub gender: Option<String>,

    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            age: req.age,
            gender: req.gender,
            language: req.language,
            bio: req.bio,
        }
    }
}

/// Get the caller's profile
pub async fn get_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .repos
        .profiles
        .find_by_user(ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::new(profile, ctx.user.email)))
}

/// Update the caller's profile
pub async fn update_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let changes = ProfileChanges::from(req).normalized()?;

    let profile = if changes.is_empty() {
        state.repos.profiles.find_by_user(ctx.user.id).await?
    } else {
        tracing::info!(user_id = %ctx.user.id, "Updating profile");
        state.repos.profiles.update(ctx.user.id, &changes).await?
    };

    let profile = profile.ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::new(profile, ctx.user.email)))
}
