use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub mod handler;
pub mod repository;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The author is always the caller; any author field in the body is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(max = 200, message = "Title cannot exceed 200 characters"))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, message = "Body cannot be empty"),
        custom(function = "not_blank")
    )]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(max = 200, message = "Title cannot exceed 200 characters"))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, message = "Body cannot be empty"),
        custom(function = "not_blank")
    )]
    pub body: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Body cannot be blank".into()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub title: String,
    pub body: String,
    pub like_count: i64,
    /// Whether the caller has liked this post; always false for anonymous callers.
    pub liked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct PostFilter {
    pub author: Option<Uuid>,
}
