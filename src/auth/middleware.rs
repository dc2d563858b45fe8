use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;
use crate::server::AppState;
use crate::types::User;

/// Extractor that resolves the bearer token to its user.
pub struct RequireUser(pub User);

/// Extractor that additionally requires the staff set (admin or referent).
/// Content management: tournaments, matches, news.
pub struct RequireStaff(pub User);

/// Extractor that requires the referent role specifically.
/// Member management and training-schedule writes.
pub struct RequireReferent(pub User);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    Forbidden,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "Account no longer exists"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient role"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                "WWW-Authenticate",
                "Bearer realm=\"libero\"".parse().unwrap(),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state)?;
        Ok(RequireUser(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireStaff {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state)?;

        if !user.role.is_staff() {
            return Err(AuthError::Forbidden);
        }

        Ok(RequireStaff(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireReferent {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state)?;

        if user.role != crate::types::Role::Referent {
            return Err(AuthError::Forbidden);
        }

        Ok(RequireReferent(user))
    }
}

fn authenticate(parts: &Parts, state: &Arc<AppState>) -> Result<User, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let raw_token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            header.strip_prefix("Bearer ").unwrap_or_default()
        }
        Some(_) => return Err(AuthError::InvalidScheme),
        None => return Err(AuthError::MissingAuth),
    };

    let claims = state.tokens.verify(raw_token).map_err(|e| match e {
        Error::TokenExpired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    // Purpose-tagged tokens (password reset) are not identity tokens.
    if claims.purpose.is_some() {
        return Err(AuthError::InvalidToken);
    }

    state
        .store
        .get_user(&claims.sub)
        .map_err(|_| AuthError::InternalError)?
        .ok_or(AuthError::UserNotFound)
}
