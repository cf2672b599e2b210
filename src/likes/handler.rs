use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::jwt,
    error::AppError,
    likes::{repository, CreateLike, LikeActionResponse, LikeFilter},
    posts,
    query::Page,
    response::{ApiResponse, ApiResponseWithStatus},
};

/// GET /api/likes
pub async fn list_likes(
    State(pool): State<PgPool>,
    Query(filter): Query<LikeFilter>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;

    let likes = repository::list(&pool, filter.post, filter.user, limit, offset).await?;

    Ok(ApiResponse::success(likes))
}

/// GET /api/likes/:id
pub async fn get_like(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let like = repository::find(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Like not found".to_string()))?;

    Ok(ApiResponse::success(like))
}

/// Toggle the caller's like on the post named in the body.
/// POST /api/likes
pub async fn create_like(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Json(payload): Json<CreateLike>,
) -> Result<impl IntoResponse, AppError> {
    toggle(&pool, claims.sub, payload.post).await
}

/// POST /api/posts/:id/like
pub async fn toggle_post_like(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    toggle(&pool, claims.sub, post_id).await
}

/// Whether the caller currently likes the post.
/// GET /api/posts/:id/liked
pub async fn like_status(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !posts::repository::exists(&pool, post_id).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let liked = repository::is_liked_by(&pool, post_id, claims.sub).await?;

    Ok(ApiResponse::success(serde_json::json!({ "liked": liked })))
}

async fn toggle(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<ApiResponseWithStatus<LikeActionResponse>, AppError> {
    let outcome = repository::toggle_like(pool, user_id, post_id).await?;
    let like_count = repository::count_for_post(pool, post_id).await?;

    let response = ApiResponse::success(LikeActionResponse {
        liked: outcome.is_created(),
        like_count,
    });

    Ok(if outcome.is_created() {
        response.created()
    } else {
        response.with_status(StatusCode::OK)
    })
}
