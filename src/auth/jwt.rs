use anyhow::Result;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::settings::Settings, error::AppError};

/// Identity of an authenticated caller. Handlers that take `Claims` reject anonymous
/// requests with 401; handlers that take `Option<Claims>` treat them as anonymous.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_token(user_id: Uuid, settings: &Settings) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::hours(settings.jwt_ttl_hours)).timestamp(),
        iat: now.timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, settings: &Settings) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    Settings: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let settings = Settings::from_ref(state);

        decode_token(bearer.token(), &settings).map_err(|e| {
            tracing::debug!("rejected bearer token: {}", e);
            AppError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_identity() {
        let settings = Settings::for_tests();
        let user_id = Uuid::new_v4();

        let token = create_token(user_id, &settings).unwrap();
        let claims = decode_token(&token, &settings).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let settings = Settings::for_tests();
        let mut other = Settings::for_tests();
        other.jwt_secret = "another-secret".to_string();

        let token = create_token(Uuid::new_v4(), &other).unwrap();
        assert!(decode_token(&token, &settings).is_err());
    }
}
