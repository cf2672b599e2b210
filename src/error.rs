use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::{self, ConstraintKind};

#[derive(Debug)]
pub enum AppError {
    InternalServerError,
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::InternalServerError => "Internal Server Error".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::UnprocessableEntity(msg) => msg,
        };

        let body = Json(json!({
            "success": false,
            "message": error_message,
            "data": null
        }));

        (status, body).into_response()
    }
}

/// Translates storage rejections into the API taxonomy. Integrity failures become
/// client errors; everything else is logged and hidden behind a 500.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = e {
            return AppError::NotFound("Resource not found".to_string());
        }

        let constraint = db::constraint_name(&e);
        match ConstraintKind::of(&e) {
            Some(ConstraintKind::Unique) | Some(ConstraintKind::Check) => {
                AppError::Conflict(violation_message(constraint.as_deref()).to_string())
            }
            Some(ConstraintKind::ForeignKey) => {
                AppError::NotFound(missing_reference_message(constraint.as_deref()).to_string())
            }
            None => {
                tracing::error!("Database error: {:?}", e);
                AppError::InternalServerError
            }
        }
    }
}

fn violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "Username already exists",
        Some("likes_unique_pair") => "Post is already liked by this user",
        Some("follows_unique_pair") => "Already following this user",
        Some("follows_no_self_follow") => "Users cannot follow themselves",
        _ => "Constraint violation",
    }
}

fn missing_reference_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("likes_post_id_fkey") => "Post not found",
        Some("likes_user_id_fkey")
        | Some("posts_author_id_fkey")
        | Some("follows_follower_id_fkey")
        | Some("follows_following_id_fkey") => "User not found",
        _ => "Referenced entity not found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn unknown_storage_faults_are_internal() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::InternalServerError));
    }

    #[test]
    fn constraint_names_get_readable_messages() {
        assert_eq!(
            violation_message(Some("follows_no_self_follow")),
            "Users cannot follow themselves"
        );
        assert_eq!(violation_message(None), "Constraint violation");
        assert_eq!(
            missing_reference_message(Some("likes_post_id_fkey")),
            "Post not found"
        );
        assert_eq!(
            missing_reference_message(Some("follows_following_id_fkey")),
            "User not found"
        );
    }

    #[test]
    fn response_body_uses_failure_envelope() {
        let response = AppError::Forbidden("Only the author can edit this post".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
