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
    follows::{repository, CreateFollow, FollowActionResponse, FollowFilter},
    query::Page,
    response::{ApiResponse, ApiResponseWithStatus},
    users,
};

/// GET /api/follows
pub async fn list_follows(
    State(pool): State<PgPool>,
    Query(filter): Query<FollowFilter>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;

    let follows =
        repository::list(&pool, filter.follower, filter.following, limit, offset).await?;

    Ok(ApiResponse::success(follows))
}

/// GET /api/follows/:id
pub async fn get_follow(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let follow = repository::find(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Follow not found".to_string()))?;

    Ok(ApiResponse::success(follow))
}

/// Toggle the caller's follow on the user named in the body.
/// POST /api/follows
pub async fn create_follow(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Json(payload): Json<CreateFollow>,
) -> Result<impl IntoResponse, AppError> {
    toggle(&pool, claims.sub, payload.following).await
}

/// POST /api/users/:id/follow
pub async fn follow_user(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    toggle(&pool, claims.sub, user_id).await
}

/// GET /api/users/:id/followers
pub async fn get_followers(
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;
    ensure_user_exists(&pool, user_id).await?;

    let followers = repository::followers_of(&pool, user_id, limit, offset).await?;

    Ok(ApiResponse::success(followers))
}

/// GET /api/users/:id/following
pub async fn get_following(
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;
    ensure_user_exists(&pool, user_id).await?;

    let following = repository::following_of(&pool, user_id, limit, offset).await?;

    Ok(ApiResponse::success(following))
}

/// Check if the caller follows a user
/// GET /api/users/:id/is-following
pub async fn check_following(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_user_exists(&pool, user_id).await?;

    let is_following = repository::is_following(&pool, claims.sub, user_id).await?;

    Ok(ApiResponse::success(
        serde_json::json!({ "following": is_following }),
    ))
}

async fn toggle(
    pool: &PgPool,
    follower: Uuid,
    target: Uuid,
) -> Result<ApiResponseWithStatus<FollowActionResponse>, AppError> {
    let outcome = repository::toggle_follow(pool, follower, target).await?;
    let followers_count = repository::followers_count(pool, target).await?;

    let response = ApiResponse::success(FollowActionResponse {
        following: outcome.is_created(),
        followers_count,
    });

    Ok(if outcome.is_created() {
        response.created()
    } else {
        response.with_status(StatusCode::OK)
    })
}

async fn ensure_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    if users::repository::exists(pool, user_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("User not found".to_string()))
    }
}
