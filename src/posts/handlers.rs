use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreatePostRequest, PostQuery};
use super::repo_types::Post;
use super::services;
use crate::{error::AppResult, record::parse_uuid, state::AppState};

pub fn post_routes() -> Router<AppState> {
    Router::new().route("/posts", get(list_posts).post(create_post))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let Json(body) = payload?;
    let user_uuid = parse_uuid(&body.user_uuid, "User")?;
    let post = services::create_post(&state, user_uuid, body.title, body.body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Post>>> {
    let Query(q) = query?;
    let posts = services::list_posts(&state, q.include_user).await?;
    Ok(Json(posts))
}
