use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::posts::repo_types::Post;
use crate::record::{assign_identity, Record};

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: Record,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    /// Only populated when the caller asked for posts.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
}

/// A user that has been validated but not inserted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

impl NewUser {
    pub fn new(name: String, email: String, role: Option<String>) -> Self {
        Self {
            uuid: assign_identity(),
            name,
            email,
            role,
        }
    }
}

/// Partial update: `None` keeps the stored value, `Some` overwrites it
/// (an empty string included).
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = Some(role);
        }
    }
}
