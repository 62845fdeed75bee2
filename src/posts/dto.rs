use serde::Deserialize;

/// Request body for POST /posts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_uuid: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
    #[serde(default)]
    pub include_user: bool,
}
