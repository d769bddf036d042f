use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, UserRecord, UserStore};

/// Process-local user store for development and tests
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users.into_iter().map(|user| (user.id.clone(), user)).collect();
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn remove(&self, id: &str) -> Option<UserRecord> {
        self.users.write().await.remove(id)
    }

    /// Returns false when no such user exists.
    pub async fn set_active(&self, id: &str, is_active: bool) -> bool {
        match self.users.write().await.get_mut(id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
