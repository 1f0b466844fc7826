// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Every request behind the middleware leaves it with a [`RequestContext`]
//! in its extensions (read it with the [`Context`] extractor), or is
//! answered with an [`AuthError`] response.
//!
//! [`RequestContext`]: super::RequestContext
//! [`Context`]: super::Context
//! [`AuthError`]: super::AuthError

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};

use super::AuthResolver;

/// Put `router` behind the authentication middleware.
///
/// ```rust,ignore
/// let resolver = AuthResolver::new(AuthOptions::from_settings(&settings));
/// let app = auth::middleware::apply(Router::new().route("/load", get(load)), resolver);
/// ```
pub fn apply<S>(router: Router<S>, resolver: AuthResolver) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(resolver, auth_middleware))
}

/// Authentication middleware function.
pub async fn auth_middleware(
    State(resolver): State<AuthResolver>,
    request: Request,
    next: Next,
) -> Response {
    resolver.handle(request, next).await
}
