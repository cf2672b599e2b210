use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{jwt, utils, AuthResponse},
    config::settings::Settings,
    error::AppError,
    policy,
    query::Page,
    response::ApiResponse,
    users::{repository, RegisterUser, UpdateUser, UserResponse},
};

/// Sign-up. Open to anonymous callers; answers with a token for the new account.
/// POST /api/users
pub async fn signup(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    Json(payload): Json<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let password_hash = utils::hash_password(&payload.password).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AppError::InternalServerError
    })?;

    let user = repository::create(&pool, &payload.username, &password_hash).await?;

    let token = jwt::create_token(user.id, &settings).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AppError::InternalServerError
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
    .created())
}

/// GET /api/users
pub async fn list_users(
    State(pool): State<PgPool>,
    Query(page): Query<Page>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page.bounds()?;

    let users: Vec<UserResponse> = repository::list(&pool, limit, offset)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id
pub async fn get_user(
    State(pool): State<PgPool>,
    claims: Option<jwt::Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = claims.map(|c| c.sub);

    let profile = repository::profile(&pool, id, viewer)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(profile))
}

/// PUT|PATCH /api/users/:id
pub async fn update_user(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    if !repository::exists(&pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    policy::ensure_owner(claims.sub, id, "modify this account")?;

    let password_hash = match &payload.password {
        Some(password) => Some(utils::hash_password(password).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::InternalServerError
        })?),
        None => None,
    };

    let user = repository::update(
        &pool,
        id,
        payload.username.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !repository::exists(&pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    policy::ensure_owner(claims.sub, id, "delete this account")?;

    repository::delete(&pool, id).await?;

    tracing::info!(user_id = %id, "user deleted");

    Ok(ApiResponse::ok("User deleted"))
}
