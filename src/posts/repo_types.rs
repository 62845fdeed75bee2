use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::record::{assign_identity, Record};
use crate::users::repo_types::User;

/// Post record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: Record,
    #[serde(skip_serializing)]
    pub user_id: i64, // owner's internal id
    pub title: String,
    pub body: String,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// A post bound to an already resolved owner, not inserted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub uuid: Uuid,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(owner: &User, title: String, body: String) -> Self {
        Self {
            uuid: assign_identity(),
            user_id: owner.record.id,
            title,
            body,
        }
    }
}
