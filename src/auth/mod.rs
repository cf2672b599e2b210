use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::users::UserResponse;

pub mod handler;
pub mod jwt;
pub mod utils;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
