use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON envelope shared by every endpoint: `{ success, message?, data? }`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Pairs the envelope with a status other than 200.
    pub fn with_status(self, status: StatusCode) -> ApiResponseWithStatus<T> {
        ApiResponseWithStatus {
            status,
            response: self,
        }
    }

    pub fn created(self) -> ApiResponseWithStatus<T> {
        self.with_status(StatusCode::CREATED)
    }
}

/// Placeholder payload for message-only responses.
#[derive(Serialize)]
pub struct EmptyData;

impl ApiResponse<EmptyData> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

pub struct ApiResponseWithStatus<T> {
    status: StatusCode,
    response: ApiResponse<T>,
}

impl<T> IntoResponse for ApiResponseWithStatus<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
