use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod handler;
pub mod repository;

/// A like as listed through the API, with the liking user's name resolved.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LikeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "username")]
    pub user: String,
    pub post: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Toggle request. The liking user is always the caller.
#[derive(Debug, Deserialize)]
pub struct CreateLike {
    pub post: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LikeFilter {
    pub post: Option<Uuid>,
    pub user: Option<Uuid>,
}

/// Result of a like toggle
#[derive(Debug, Serialize)]
pub struct LikeActionResponse {
    pub liked: bool,
    pub like_count: i64,
}
