use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::posts::repo::posts_by_owners;
use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by insertion, optionally with their posts.
    async fn list(&self, include_posts: bool) -> anyhow::Result<Vec<User>>;
    async fn find_by_uuid(&self, uuid: Uuid, include_posts: bool)
        -> anyhow::Result<Option<User>>;
    async fn insert(&self, new_user: &NewUser) -> anyhow::Result<User>;
    /// Writes name/email/role and refreshes `updated_at`. `None` when the
    /// row no longer exists.
    async fn update(&self, user: &User) -> anyhow::Result<Option<User>>;
    /// `false` when there was no row to remove.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn attach_posts(&self, users: &mut [User]) -> anyhow::Result<()> {
        let ids: Vec<i64> = users.iter().map(|u| u.record.id).collect();
        let mut by_owner = HashMap::<i64, Vec<_>>::new();
        for post in posts_by_owners(&self.db, &ids).await? {
            by_owner.entry(post.user_id).or_default().push(post);
        }
        for user in users.iter_mut() {
            user.posts = Some(by_owner.remove(&user.record.id).unwrap_or_default());
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, include_posts: bool) -> anyhow::Result<Vec<User>> {
        let mut users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, created_at, updated_at, name, email, role
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;

        if include_posts {
            self.attach_posts(&mut users).await?;
        }
        Ok(users)
    }

    async fn find_by_uuid(
        &self,
        uuid: Uuid,
        include_posts: bool,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, created_at, updated_at, name, email, role
            FROM users
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.db)
        .await
        .context("find user by uuid")?;

        match user {
            Some(user) if include_posts => {
                let mut users = [user];
                self.attach_posts(&mut users).await?;
                let [user] = users;
                Ok(Some(user))
            }
            other => Ok(other),
        }
    }

    async fn insert(&self, new_user: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (uuid, name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, uuid, created_at, updated_at, name, email, role
            "#,
        )
        .bind(new_user.uuid)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.role)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> anyhow::Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $2, email = $3, role = $4, updated_at = now()
             WHERE id = $1
            RETURNING id, uuid, created_at, updated_at, name, email, role
            "#,
        )
        .bind(user.record.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }
}

/// Users with the given internal ids, used to materialize post owners.
pub(crate) async fn users_by_ids(db: &PgPool, ids: &[i64]) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, uuid, created_at, updated_at, name, email, role
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await
    .context("load post owners")?;
    Ok(users)
}
