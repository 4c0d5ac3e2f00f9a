//! Bearer tokens for the watch-party socket and the per-user routes.
//!
//! Tokens are HS256 JWTs. The user id comes from `userId` when present,
//! falling back to the standard `sub` claim.

use std::fmt;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use super::{app_state::AppState, errors::AppError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketClaims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Identity attached to an accepted socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign a token for `user_id` valid for `ttl`.
    pub fn issue(
        &self,
        user_id: &str,
        ttl: TimeDelta,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SocketClaims {
            user_id: Some(user_id.to_string()),
            sub: Some(user_id.to_string()),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: Option<&str>) -> Result<AuthenticatedUser, AppError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Authentication token missing"))?;

        let data = decode::<SocketClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "socket token rejected");
                AppError::unauthorized("Unauthorized")
            })?;

        let claims = data.claims;
        let user_id = claims
            .user_id
            .or(claims.sub)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid token payload"))?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Pulls the caller out of `Authorization: Bearer <token>`.
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.tokens.verify(bearer_token(&parts.headers))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
