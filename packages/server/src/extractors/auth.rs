use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use common::config::ContestConfig;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Take `AuthUser` to require authentication, or `Option<AuthUser>` on routes
/// that also serve anonymous callers. A present but invalid token is rejected
/// either way.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self, contest: &ContestConfig) -> bool {
        self.role == contest.admin_role
    }

    /// Returns `Err(PermissionDenied)` unless the user holds the admin role.
    pub fn require_admin(&self, contest: &ContestConfig) -> Result<(), AppError> {
        if self.is_admin(contest) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

fn decode_header(value: &str, secret: &str) -> Result<AuthUser, AppError> {
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let claims = jwt::verify(token, secret).map_err(|_| AppError::TokenInvalid)?;

    Ok(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::TokenMissing)?
            .to_str()
            .map_err(|_| AppError::TokenInvalid)?;

        decode_header(auth_header, &state.config.auth.jwt_secret)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let auth_header = value.to_str().map_err(|_| AppError::TokenInvalid)?;
        decode_header(auth_header, &state.config.auth.jwt_secret).map(Some)
    }
}
