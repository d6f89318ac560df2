//! Repository implementations for Accounts domain

pub mod profiles;
pub mod transactions;
pub mod users;

use sqlx::PgPool;

pub use profiles::ProfileRepository;
pub use users::UserRepository;

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pool: PgPool,
    pub users: UserRepository,
    pub profiles: ProfileRepository,
}

impl AccountsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool (for transactions)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
