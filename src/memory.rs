//! In-memory repositories backing `AppState::fake()` in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::posts::repo::PostRepository;
use crate::posts::repo_types::{NewPost, Post};
use crate::record::Record;
use crate::users::repo::UserRepository;
use crate::users::repo_types::{NewUser, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    user_seq: i64,
    post_seq: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    rows_vanish: AtomicBool,
}

impl MemoryStore {
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Makes update/delete behave as if a concurrent request removed the row
    /// right after it was looked up.
    pub fn rows_vanish(&self, on: bool) {
        self.rows_vanish.store(on, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    fn check_read(&self) -> anyhow::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated read failure");
        }
        Ok(())
    }

    fn check_write(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("simulated write failure");
        }
        Ok(())
    }
}

fn record(id: i64, uuid: Uuid) -> Record {
    let now = OffsetDateTime::now_utc();
    Record {
        id,
        uuid,
        created_at: now,
        updated_at: now,
    }
}

fn with_posts(tables: &Tables, mut user: User) -> User {
    user.posts = Some(
        tables
            .posts
            .iter()
            .filter(|p| p.user_id == user.record.id)
            .cloned()
            .collect(),
    );
    user
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self, include_posts: bool) -> anyhow::Result<Vec<User>> {
        self.check_read()?;
        let t = self.lock();
        Ok(t.users
            .iter()
            .cloned()
            .map(|u| if include_posts { with_posts(&t, u) } else { u })
            .collect())
    }

    async fn find_by_uuid(
        &self,
        uuid: Uuid,
        include_posts: bool,
    ) -> anyhow::Result<Option<User>> {
        self.check_read()?;
        let t = self.lock();
        let user = t.users.iter().find(|u| u.record.uuid == uuid).cloned();
        Ok(match user {
            Some(u) if include_posts => Some(with_posts(&t, u)),
            other => other,
        })
    }

    async fn insert(&self, new_user: &NewUser) -> anyhow::Result<User> {
        self.check_write()?;
        let mut t = self.lock();
        anyhow::ensure!(
            t.users.iter().all(|u| u.record.uuid != new_user.uuid),
            "duplicate uuid"
        );
        t.user_seq += 1;
        let user = User {
            record: record(t.user_seq, new_user.uuid),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role.clone(),
            posts: None,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> anyhow::Result<Option<User>> {
        self.check_write()?;
        if self.rows_vanish.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut t = self.lock();
        let Some(stored) = t.users.iter_mut().find(|u| u.record.id == user.record.id) else {
            return Ok(None);
        };
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.role = user.role.clone();
        stored.record.updated_at = OffsetDateTime::now_utc();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.check_write()?;
        if self.rows_vanish.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut t = self.lock();
        let before = t.users.len();
        t.users.retain(|u| u.record.id != id);
        t.posts.retain(|p| p.user_id != id);
        Ok(t.users.len() < before)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert(&self, new_post: &NewPost) -> anyhow::Result<Post> {
        self.check_write()?;
        let mut t = self.lock();
        anyhow::ensure!(
            t.users.iter().any(|u| u.record.id == new_post.user_id),
            "foreign key violation"
        );
        t.post_seq += 1;
        let post = Post {
            record: record(t.post_seq, new_post.uuid),
            user_id: new_post.user_id,
            title: new_post.title.clone(),
            body: new_post.body.clone(),
            user: None,
        };
        t.posts.push(post.clone());
        Ok(post)
    }

    async fn list(&self, include_user: bool) -> anyhow::Result<Vec<Post>> {
        self.check_read()?;
        let t = self.lock();
        let owners: HashMap<i64, &User> = t.users.iter().map(|u| (u.record.id, u)).collect();
        Ok(t.posts
            .iter()
            .cloned()
            .map(|mut p| {
                if include_user {
                    p.user = owners.get(&p.user_id).map(|u| (*u).clone());
                }
                p
            })
            .collect())
    }
}
