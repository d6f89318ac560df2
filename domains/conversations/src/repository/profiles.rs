//! Read-only profile lookup for personalization (CQRS read model of `profiles`)

use pha_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::ChatProfile;

#[derive(Clone)]
pub struct ProfileReadRepository {
    pool: PgPool,
}

impl ProfileReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ChatProfile>> {
        let profile = sqlx::query_as::<_, ChatProfile>(
            r#"
            SELECT display_name, age, language
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
