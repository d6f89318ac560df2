//! Profile repository

use crate::domain::entities::{Profile, ProfileChanges};
use pha_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the profile of a user
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, display_name, age, gender, language, bio,
                   created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Apply a partial update; absent fields keep their stored value
    pub async fn update(&self, user_id: Uuid, changes: &ProfileChanges) -> Result<Option<Profile>> {
        let updated = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                language = COALESCE($5, language),
                bio = COALESCE($6, bio),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, display_name, age, gender, language, bio,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&changes.display_name)
        .bind(changes.age)
        .bind(&changes.gender)
        .bind(&changes.language)
        .bind(&changes.bio)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
