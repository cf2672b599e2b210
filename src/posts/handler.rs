use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::jwt,
    error::AppError,
    posts::{repository, CreatePost, PostFilter, PostResponse, UpdatePost},
    query::Page,
    response::ApiResponse,
};

/// POST /api/posts
pub async fn create_post(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Json(payload): Json<CreatePost>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let title = payload.title.as_deref().unwrap_or_default();
    let post = repository::create(&pool, claims.sub, title, &payload.body).await?;

    tracing::info!(post_id = %post.id, author_id = %claims.sub, "post created");

    let response = load_post(&pool, post.id, Some(claims.sub)).await?;
    Ok(ApiResponse::success(response).created())
}

/// GET /api/posts
pub async fn list_posts(
    State(pool): State<PgPool>,
    claims: Option<jwt::Claims>,
    Query(filter): Query<PostFilter>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;
    let viewer = claims.map(|c| c.sub);

    let posts = repository::list(&pool, filter.author, viewer, limit, offset).await?;

    Ok(ApiResponse::success(posts))
}

/// Posts from the accounts the caller follows.
/// GET /api/posts/feed
pub async fn get_feed(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;

    let posts = repository::feed(&pool, claims.sub, limit, offset).await?;

    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:id
pub async fn get_post(
    State(pool): State<PgPool>,
    claims: Option<jwt::Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = claims.map(|c| c.sub);
    let post = load_post(&pool, id, viewer).await?;

    Ok(ApiResponse::success(post))
}

/// PUT|PATCH /api/posts/:id
pub async fn update_post(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePost>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    repository::update(
        &pool,
        claims.sub,
        id,
        payload.title.as_deref(),
        payload.body.as_deref(),
    )
    .await?;

    let post = load_post(&pool, id, Some(claims.sub)).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    repository::delete(&pool, claims.sub, id).await?;

    tracing::info!(post_id = %id, "post deleted");

    Ok(ApiResponse::ok("Post deleted"))
}

async fn load_post(
    pool: &PgPool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<PostResponse, AppError> {
    repository::view(pool, id, viewer)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))
}
