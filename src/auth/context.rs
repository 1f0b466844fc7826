// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request context handed to downstream handlers.

use std::sync::Arc;

use axum::http::HeaderMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use uuid::Uuid;

use super::Claims;

/// Header carrying a caller supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolved security context of one request.
///
/// The claims are stored once. `security_context()` and the legacy
/// `auth_info()` are two views of that single value and always return the
/// same `Arc`, so code written against either name observes identical data.
#[derive(Debug, Clone)]
pub struct RequestContext {
    claims: Option<Arc<Claims>>,
    request_id: String,
}

impl RequestContext {
    /// Build the context from whatever the auth strategy stored.
    ///
    /// `security_context` is authoritative; `auth_info` is only used when no
    /// security context was set.
    pub fn resolve(
        auth_info: Option<Claims>,
        security_context: Option<Claims>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            claims: security_context.or(auth_info).map(Arc::new),
            request_id: request_id.into(),
        }
    }

    pub fn security_context(&self) -> Option<&Arc<Claims>> {
        self.claims.as_ref()
    }

    /// Legacy name of [`RequestContext::security_context`].
    pub fn auth_info(&self) -> Option<&Arc<Claims>> {
        self.claims.as_ref()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Serialize for RequestContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let claims = self.claims.as_deref();

        let mut state = serializer.serialize_struct("RequestContext", 3)?;
        state.serialize_field("securityContext", &claims)?;
        state.serialize_field("authInfo", &claims)?;
        state.serialize_field("requestId", &self.request_id)?;
        state.end()
    }
}

/// Request id from `x-request-id`, or a freshly generated one.
pub fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-span-1", Uuid::new_v4()))
}
