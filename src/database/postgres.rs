use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{StoreError, Subject, UserRecord, UserStore};
use crate::config::DatabaseConfig;

const FIND_USER: &str = r#"
    SELECT id, email, name, is_active, password_hash
    FROM users
    WHERE id = $1
"#;

const FIND_SUBJECT: &str = r#"
    SELECT id, email, name, is_active
    FROM users
    WHERE id = $1
"#;

/// User store backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a lazily connecting pool; nothing is dialed until the first lookup.
    pub fn connect_lazy(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(url)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(FIND_USER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_subject_by_id(&self, id: &str) -> Result<Option<Subject>, StoreError> {
        let subject = sqlx::query_as::<_, Subject>(FIND_SUBJECT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(subject)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
