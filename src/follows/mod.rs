use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod handler;
pub mod repository;

/// A follow edge as listed through the API
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FollowResponse {
    pub id: Uuid,
    pub follower_id: Uuid,
    #[sqlx(rename = "username")]
    pub follower: String,
    pub following: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Toggle request. The follower is always the caller.
#[derive(Debug, Deserialize)]
pub struct CreateFollow {
    pub following: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FollowFilter {
    pub follower: Option<Uuid>,
    pub following: Option<Uuid>,
}

/// A user in a followers/following list
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FollowUserResponse {
    pub id: Uuid,
    pub username: String,
    pub followed_at: chrono::DateTime<chrono::Utc>,
}

/// Result of a follow toggle
#[derive(Debug, Serialize)]
pub struct FollowActionResponse {
    pub following: bool,
    pub followers_count: i64,
}
