use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account document as held by the user store.
#[derive(Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Public projection of a user, attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_active: bool,
}

impl From<UserRecord> for Subject {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            is_active: record.is_active,
        }
    }
}
