use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserQuery};
use super::repo_types::User;
use super::services;
use crate::{error::AppResult, record::parse_uuid, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:uuid",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> AppResult<Json<Vec<User>>> {
    let Query(q) = query?;
    let users = services::list_users(&state, q.include_posts).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<User>)> {
    let Json(body) = payload?;
    let user = services::create_user(&state, body).await?;
    let location = format!("/users/{}", user.record.uuid);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> AppResult<Json<User>> {
    let uuid = parse_uuid(&uuid, "User")?;
    let Query(q) = query?;
    let user = services::get_user(&state, uuid, q.include_posts).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let uuid = parse_uuid(&uuid, "User")?;
    let Json(body) = payload?;
    let user = services::update_user(&state, uuid, body.into()).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let uuid = parse_uuid(&uuid, "User")?;
    let message = services::delete_user(&state, uuid).await?;
    Ok(Json(MessageResponse { message }))
}
