use axum::{extract::State, response::IntoResponse, Json};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::{jwt, utils, AuthResponse, LoginUser},
    config::settings::Settings,
    error::AppError,
    response::ApiResponse,
    users::{repository, UserResponse},
};

/// POST /api/auth/sign-in
pub async fn login(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    Json(payload): Json<LoginUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let user = repository::find_by_username(&pool, &payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    utils::verify_password(&user.password_hash, &payload.password)
        .map_err(|_| AppError::Unauthorized)?;

    let token = jwt::create_token(user.id, &settings).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AppError::InternalServerError
    })?;

    Ok(ApiResponse::success(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// GET /api/auth/me
pub async fn get_me(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
) -> Result<impl IntoResponse, AppError> {
    let user = repository::find_by_id(&pool, claims.sub)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}
