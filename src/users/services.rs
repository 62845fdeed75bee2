use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FieldError};
use crate::state::AppState;
use crate::users::dto::CreateUserRequest;
use crate::users::repo_types::{NewUser, User, UserPatch};

pub(crate) const ROLES: [&str; 3] = ["user", "admin", "superadmin"];
const NAME_MAX_CHARS: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks every field constraint and returns all violations together.
pub fn validate_new_user(req: CreateUserRequest) -> AppResult<NewUser> {
    let mut errors = Vec::new();

    match req.name.as_deref() {
        None => errors.push(FieldError::new("name", "name is required")),
        Some(n) if n.is_empty() || n.chars().count() > NAME_MAX_CHARS => errors.push(
            FieldError::new("name", format!("name must be 1 to {NAME_MAX_CHARS} characters")),
        ),
        Some(_) => {}
    }

    match req.email.as_deref() {
        None => errors.push(FieldError::new("email", "email is required")),
        Some(e) if !is_valid_email(e) => {
            errors.push(FieldError::new("email", "email must be a valid address"))
        }
        Some(_) => {}
    }

    if let Some(role) = req.role.as_deref() {
        if !ROLES.contains(&role) {
            errors.push(FieldError::new(
                "role",
                format!("role must be one of {}", ROLES.join(", ")),
            ));
        }
    }

    match (req.name, req.email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(NewUser::new(name, email, req.role)),
        _ => Err(AppError::Validation(errors)),
    }
}

pub async fn list_users(st: &AppState, include_posts: bool) -> AppResult<Vec<User>> {
    Ok(st.users.list(include_posts).await?)
}

pub async fn create_user(st: &AppState, req: CreateUserRequest) -> AppResult<User> {
    let new_user = validate_new_user(req)?;
    let user = st.users.insert(&new_user).await?;
    info!(user_uuid = %user.record.uuid, "user created");
    Ok(user)
}

pub async fn get_user(st: &AppState, uuid: Uuid, include_posts: bool) -> AppResult<User> {
    st.users
        .find_by_uuid(uuid, include_posts)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub async fn update_user(st: &AppState, uuid: Uuid, patch: UserPatch) -> AppResult<User> {
    let mut user = get_user(st, uuid, false).await?;
    patch.apply(&mut user);
    // the row can disappear between the lookup and the write
    let user = st
        .users
        .update(&user)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_uuid = %user.record.uuid, "user updated");
    Ok(user)
}

pub async fn delete_user(st: &AppState, uuid: Uuid) -> AppResult<String> {
    let user = get_user(st, uuid, false).await?;
    if !st.users.delete(user.record.id).await? {
        return Err(AppError::NotFound("User"));
    }
    info!(user_uuid = %uuid, "user deleted");
    Ok("User deleted successfully".into())
}
