// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-flight request seen by the authentication hooks.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Extensions, HeaderMap, Method, Uri},
    middleware::Next,
    response::Response,
};

use super::context::{request_id_from_headers, RequestContext};
use super::{AuthError, Claims};

/// A request travelling through the auth middleware.
///
/// Hooks store their verification result in one of two slots:
/// `security_context` (current) or `auth_info` (legacy). The slots are only
/// read once, when the [`Continuation`] builds the [`RequestContext`].
#[derive(Debug)]
pub struct AuthRequest {
    inner: Request,
    auth_info: Option<Claims>,
    security_context: Option<Claims>,
}

impl AuthRequest {
    pub fn new(inner: Request) -> Self {
        Self {
            inner,
            auth_info: None,
            security_context: None,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.inner.extensions_mut()
    }

    /// Raw `Authorization` header value, untouched.
    pub fn authorization(&self) -> Option<&str> {
        self.headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Credential carried by the `Authorization` header.
    ///
    /// The scheme prefix (`Bearer `, `Authorization: `, ...) is dropped by
    /// keeping the last whitespace separated segment. An empty header counts
    /// as no credential.
    pub fn credential(&self) -> Result<Option<&str>, AuthError> {
        let Some(value) = self.headers().get(AUTHORIZATION) else {
            return Ok(None);
        };
        let raw = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

        Ok(raw.split_whitespace().last())
    }

    /// Store claims under the legacy `authInfo` name.
    pub fn set_auth_info(&mut self, claims: Claims) {
        self.auth_info = Some(claims);
    }

    /// Store claims under the current `securityContext` name.
    pub fn set_security_context(&mut self, claims: Claims) {
        self.security_context = Some(claims);
    }

    pub fn auth_info(&self) -> Option<&Claims> {
        self.auth_info.as_ref()
    }

    pub fn security_context(&self) -> Option<&Claims> {
        self.security_context.as_ref()
    }

    /// Resolve the slots into a [`RequestContext`] and attach it to the request.
    pub(crate) fn into_resolved(self) -> Request {
        let AuthRequest {
            mut inner,
            auth_info,
            security_context,
        } = self;

        let request_id = request_id_from_headers(inner.headers());
        let context = RequestContext::resolve(auth_info, security_context, request_id);
        inner.extensions_mut().insert(context);
        inner
    }
}

/// Rest of the middleware chain.
///
/// Running it resolves the request context and hands the request to the next
/// handler. It is consumed on use, so it can run at most once.
pub struct Continuation {
    next: Next,
}

impl Continuation {
    pub(crate) fn new(next: Next) -> Self {
        Self { next }
    }

    pub async fn run(self, request: AuthRequest) -> Response {
        self.next.run(request.into_resolved()).await
    }
}
