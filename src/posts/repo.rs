use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::posts::repo_types::{NewPost, Post};
use crate::users::repo::users_by_ids;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, new_post: &NewPost) -> anyhow::Result<Post>;
    /// All posts ordered by insertion, optionally with their owner.
    async fn list(&self, include_user: bool) -> anyhow::Result<Vec<Post>>;
}

#[derive(Clone)]
pub struct PgPostRepository {
    db: PgPool,
}

impl PgPostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, new_post: &NewPost) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (uuid, user_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, uuid, created_at, updated_at, user_id, title, body
            "#,
        )
        .bind(new_post.uuid)
        .bind(new_post.user_id)
        .bind(&new_post.title)
        .bind(&new_post.body)
        .fetch_one(&self.db)
        .await
        .context("insert post")?;
        Ok(post)
    }

    async fn list(&self, include_user: bool) -> anyhow::Result<Vec<Post>> {
        let mut posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, uuid, created_at, updated_at, user_id, title, body
            FROM posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list posts")?;

        if include_user {
            let mut owner_ids: Vec<i64> = posts.iter().map(|p| p.user_id).collect();
            owner_ids.sort_unstable();
            owner_ids.dedup();
            let owners: HashMap<i64, _> = users_by_ids(&self.db, &owner_ids)
                .await?
                .into_iter()
                .map(|u| (u.record.id, u))
                .collect();
            for post in &mut posts {
                post.user = owners.get(&post.user_id).cloned();
            }
        }
        Ok(posts)
    }
}

/// Posts owned by any of the given users, in insertion order.
pub(crate) async fn posts_by_owners(db: &PgPool, owner_ids: &[i64]) -> anyhow::Result<Vec<Post>> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, uuid, created_at, updated_at, user_id, title, body
          FROM posts
         WHERE user_id = ANY($1)
         ORDER BY id
        "#,
    )
    .bind(owner_ids)
    .fetch_all(db)
    .await
    .context("list posts by owner")?;
    Ok(posts)
}
