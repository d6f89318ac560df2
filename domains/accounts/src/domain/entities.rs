//! Domain entities for the Accounts domain
//!
//! A `User` holds the login identity and credential; its `Profile` holds
//! everything the user can edit. Both are created together at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pha_common::{Error, Result};

/// Language preference for new profiles
pub const DEFAULT_LANGUAGE: &str = "id";

/// Maximum email length (varchar(255))
const MAX_EMAIL_LENGTH: usize = 255;

/// Lowercase and trim an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user from a normalized email and a password hash
    pub fn new(email: String, password_hash: String) -> Result<Self> {
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("Invalid email address".to_string()));
        }
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(Error::Validation(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LENGTH
            )));
        }
        if password_hash.is_empty() {
            return Err(Error::Validation("Password hash is required".to_string()));
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Part of the email before `@`, used as the initial display name
    #[mutants::skip] // new() guarantees an '@'; the fallback arm is unreachable
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Profile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub language: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The profile every new user starts with
    pub fn for_new_user(user: &User) -> Self {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id: user.id,
            display_name: user.email_local_part().to_string(),
            age: None,
            gender: None,
            language: DEFAULT_LANGUAGE.to_string(),
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub bio: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self == &ProfileChanges::default()
    }

    /// Trim free-text fields; a blank display name is rejected
    pub fn normalized(self) -> Result<Self> {
        let display_name = match self.display_name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(Error::Validation(
                        "Display name cannot be blank".to_string(),
                    ));
                }
                Some(name)
            }
            None => None,
        };

        Ok(ProfileChanges {
            display_name,
            age: self.age,
            gender: self.gender.map(|g| g.trim().to_string()),
            language: self.language.map(|l| l.trim().to_lowercase()),
            bio: self.bio,
        })
    }
}
