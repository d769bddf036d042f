pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryUserStore;
pub use models::{Subject, UserRecord};
pub use postgres::PgUserStore;

/// Errors from a user store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Read access to account records, injected into the authenticators.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Lookup for the access path; never carries the password hash.
    async fn find_subject_by_id(&self, id: &str) -> Result<Option<Subject>, StoreError> {
        Ok(self.find_by_id(id).await?.map(Subject::from))
    }

    /// Liveness probe used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
