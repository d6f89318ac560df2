//! Transactional free functions for Accounts domain (Zero2Prod pattern)

use crate::domain::entities::{Profile, User};
use pha_common::{is_unique_violation, RepositoryError};
use sqlx::{Postgres, Transaction};

const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Insert a user within an existing transaction.
///
/// Returns `RepositoryError::AlreadyExists` when the email is taken.
pub async fn create_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user: &User,
) -> std::result::Result<User, RepositoryError> {
    let created = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, Some(USERS_EMAIL_CONSTRAINT)) {
            RepositoryError::AlreadyExists
        } else {
            RepositoryError::Connection(e)
        }
    })?;

    Ok(created)
}

/// Insert a profile within an existing transaction.
pub async fn create_profile_tx(
    transaction: &mut Transaction<'_, Postgres>,
    profile: &Profile,
) -> std::result::Result<Profile, sqlx::Error> {
    let created = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (
            id, user_id, display_name, age, gender, language, bio,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, display_name, age, gender, language, bio,
                  created_at, updated_at
        "#,
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.display_name)
    .bind(profile.age)
    .bind(&profile.gender)
    .bind(&profile.language)
    .bind(&profile.bio)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .fetch_one(&mut **transaction)
    .await?;

    Ok(created)
}
