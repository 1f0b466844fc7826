// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication error type.
///
/// A missing credential is deliberately absent from this list: requests
/// without one proceed with an empty security context.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Authorization header is present but not readable
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    /// Token is malformed or its payload is not a claims object
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token is not yet valid
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// A custom `checkAuth` callback rejected the request
    #[error("Authentication callback failed: {0}")]
    CallbackFailure(String),
    /// Handler asked for a request context but the auth middleware is not mounted
    #[error("Request context is unavailable")]
    ContextUnavailable,
    /// Internal error
    #[error("Internal authentication error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::CallbackFailure(_) => "callback_failure",
            AuthError::ContextUnavailable => "context_unavailable",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid => StatusCode::UNAUTHORIZED,
            AuthError::CallbackFailure(_) => StatusCode::FORBIDDEN,
            AuthError::ContextUnavailable | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Map a `jsonwebtoken` failure onto the verification taxonomy.
    pub(crate) fn from_jwt(err: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_signature_returns_401() {
        let response = AuthError::InvalidSignature.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "invalid_signature");
        assert_eq!(body["error"], "Token signature is invalid");
    }

    #[tokio::test]
    async fn callback_failure_returns_403() {
        let response = AuthError::CallbackFailure("denied".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_context_is_a_server_error() {
        assert_eq!(
            AuthError::ContextUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn jwt_time_failures_keep_their_kind() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let immature = AuthError::from_jwt(&Error::from(ErrorKind::ImmatureSignature));
        assert!(matches!(immature, AuthError::TokenNotYetValid));
        assert_eq!(immature.status_code(), StatusCode::UNAUTHORIZED);

        let expired = AuthError::from_jwt(&Error::from(ErrorKind::ExpiredSignature));
        assert!(matches!(expired, AuthError::TokenExpired));
    }
}
