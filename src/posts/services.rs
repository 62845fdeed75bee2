use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::posts::repo_types::{NewPost, Post};
use crate::state::AppState;

/// Resolves the owner first; nothing is written when the user is unknown.
pub async fn create_post(
    st: &AppState,
    user_uuid: Uuid,
    title: String,
    body: String,
) -> AppResult<Post> {
    let owner = st
        .users
        .find_by_uuid(user_uuid, false)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let new_post = NewPost::new(&owner, title, body);
    let mut post = st.posts.insert(&new_post).await?;
    info!(post_uuid = %post.record.uuid, user_uuid = %owner.record.uuid, "post created");
    post.user = Some(owner);
    Ok(post)
}

pub async fn list_posts(st: &AppState, include_user: bool) -> AppResult<Vec<Post>> {
    Ok(st.posts.list(include_user).await?)
}
