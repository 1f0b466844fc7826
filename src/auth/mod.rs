// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Resolves the security context of every gateway request.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>` (the scheme is optional)
//! 2. The gateway runs exactly one of the configured strategies:
//!    - `checkAuthMiddleware` override: owns the whole request
//!    - `checkAuth` callback: verifies the credential itself (sync or async)
//!    - default: HMAC JWT verification against the API secret
//! 3. The resolved claims are stored once and exposed to handlers as both
//!    `securityContext` and the legacy `authInfo`
//!
//! ## Failure Policy
//!
//! - A missing credential is not an error, handlers see an empty context
//! - An invalid credential or a failed callback rejects the request
//! - Deprecation sink failures never affect the request

pub mod claims;
pub mod context;
pub mod deprecation;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod request;
pub mod resolver;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::Claims;
pub use context::RequestContext;
pub use deprecation::{DeprecationEvent, DeprecationReporter, DeprecationSink, SinkError};
pub use error::AuthError;
pub use extractor::Context;
pub use request::{AuthRequest, Continuation};
pub use resolver::{
    check_auth_fn, AuthOptions, AuthResolver, AuthStrategy, CheckAuth, CheckAuthMiddleware,
};
pub use verifier::{SecretVerifier, TokenVerifier};
