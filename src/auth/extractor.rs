// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the resolved request context.
//!
//! ```rust,ignore
//! async fn my_handler(Context(ctx): Context) -> impl IntoResponse {
//!     let uid = ctx.security_context().and_then(|c| c.get("uid").cloned());
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, RequestContext};

/// Extractor for the [`RequestContext`] stored by the auth middleware.
///
/// Rejects with [`AuthError::ContextUnavailable`] when the route is not
/// behind the middleware. A request without credentials still yields a
/// context, with an empty security context.
pub struct Context(pub RequestContext);

impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Context)
            .ok_or(AuthError::ContextUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use axum::http::Request;
    use serde_json::json;
    use std::sync::Arc;

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn rejects_without_middleware() {
        let mut parts = empty_parts();

        let result = Context::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::ContextUnavailable)));
    }

    #[tokio::test]
    async fn returns_context_from_extensions() {
        let mut parts = empty_parts();
        let ctx = RequestContext::resolve(
            Some(Claims::try_from(json!({ "uid": 5 })).unwrap()),
            None,
            "req-1",
        );
        parts.extensions.insert(ctx.clone());

        let Context(extracted) = Context::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.request_id(), "req-1");
        assert!(Arc::ptr_eq(
            extracted.security_context().unwrap(),
            ctx.auth_info().unwrap()
        ));
    }
}
