// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication strategy selection and execution.
//!
//! The gateway accepts three ways of authenticating a request, in order of
//! precedence:
//!
//! 1. `checkAuthMiddleware` - deprecated full override of the auth middleware
//! 2. `checkAuth` - custom verification callback, sync or async
//! 3. default - [`SecretVerifier`] against the API secret
//!
//! The precedence is applied once, when the [`AuthResolver`] is built, and
//! the result is kept as an [`AuthStrategy`].

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::deprecation::{DeprecationEvent, DeprecationReporter, DeprecationSink};
use super::request::{AuthRequest, Continuation};
use super::verifier::{SecretVerifier, TokenVerifier};
use super::AuthError;
use crate::config::{AuthSettings, DEFAULT_DEPRECATION_DOC_URL};
use crate::BoxFuture;

/// Custom credential verification (`checkAuth`).
///
/// Receives the request and the extracted credential, if any, and is
/// expected to store the resulting claims on the request. The returned
/// future is awaited before the request continues; an error rejects it.
///
/// The error is answered as is, so the callback picks the response:
/// [`AuthError::CallbackFailure`] gives 403, while a verification error
/// bubbled up with `?` keeps its own 401 code.
pub trait CheckAuth: Send + Sync {
    fn check<'a>(
        &'a self,
        request: &'a mut AuthRequest,
        credential: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), AuthError>>;
}

/// Full replacement of the auth middleware (`checkAuthMiddleware`).
///
/// The override owns the request: it must populate the claims itself and
/// either run the [`Continuation`] or answer the request on its own.
pub trait CheckAuthMiddleware: Send + Sync {
    fn call<'a>(&'a self, request: AuthRequest, next: Continuation) -> BoxFuture<'a, Response>;
}

struct SyncCheckAuth<F>(F);

impl<F> CheckAuth for SyncCheckAuth<F>
where
    F: Fn(&mut AuthRequest, Option<&str>) -> Result<(), AuthError> + Send + Sync,
{
    fn check<'a>(
        &'a self,
        request: &'a mut AuthRequest,
        credential: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), AuthError>> {
        Box::pin(std::future::ready((self.0)(request, credential)))
    }
}

/// Wrap a synchronous closure as a [`CheckAuth`] callback.
pub fn check_auth_fn<F>(f: F) -> Arc<dyn CheckAuth>
where
    F: Fn(&mut AuthRequest, Option<&str>) -> Result<(), AuthError> + Send + Sync + 'static,
{
    Arc::new(SyncCheckAuth(f))
}

/// Gateway authentication options.
pub struct AuthOptions {
    secret: String,
    leeway_seconds: Option<u64>,
    doc_link: String,
    verifier: Option<Arc<dyn TokenVerifier>>,
    check_auth: Option<Arc<dyn CheckAuth>>,
    check_auth_middleware: Option<Arc<dyn CheckAuthMiddleware>>,
    logger: Option<Arc<dyn DeprecationSink>>,
}

impl AuthOptions {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway_seconds: None,
            doc_link: DEFAULT_DEPRECATION_DOC_URL.to_string(),
            verifier: None,
            check_auth: None,
            check_auth_middleware: None,
            logger: None,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        let mut options = Self::new(settings.secret.clone())
            .with_doc_link(settings.deprecation_doc_url.clone());
        options.leeway_seconds = Some(settings.leeway_seconds);
        options
    }

    /// Link appended to deprecation warnings.
    pub fn with_doc_link(mut self, doc_link: impl Into<String>) -> Self {
        self.doc_link = doc_link.into();
        self
    }

    /// Replace the default secret verifier.
    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_check_auth(mut self, check_auth: Arc<dyn CheckAuth>) -> Self {
        self.check_auth = Some(check_auth);
        self
    }

    pub fn with_check_auth_middleware(mut self, middleware: Arc<dyn CheckAuthMiddleware>) -> Self {
        self.check_auth_middleware = Some(middleware);
        self
    }

    /// Sink receiving deprecation diagnostics. Defaults to tracing.
    pub fn with_logger(mut self, logger: Arc<dyn DeprecationSink>) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Selected authentication strategy.
#[derive(Clone)]
pub enum AuthStrategy {
    Default,
    Callback(Arc<dyn CheckAuth>),
    FullOverride(Arc<dyn CheckAuthMiddleware>),
}

impl AuthStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            AuthStrategy::Default => "default",
            AuthStrategy::Callback(_) => "check_auth",
            AuthStrategy::FullOverride(_) => "check_auth_middleware",
        }
    }
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct ResolverInner {
    strategy: AuthStrategy,
    verifier: Arc<dyn TokenVerifier>,
    reporter: DeprecationReporter,
    doc_link: String,
}

/// Runs the configured authentication strategy for each request.
///
/// Cheap to clone; the configuration is shared and never mutated.
#[derive(Clone)]
pub struct AuthResolver {
    inner: Arc<ResolverInner>,
}

impl AuthResolver {
    pub fn new(options: AuthOptions) -> Self {
        let AuthOptions {
            secret,
            leeway_seconds,
            doc_link,
            verifier,
            check_auth,
            check_auth_middleware,
            logger,
        } = options;

        let reporter = logger
            .map(DeprecationReporter::new)
            .unwrap_or_else(DeprecationReporter::tracing);

        let verifier: Arc<dyn TokenVerifier> = match (verifier, leeway_seconds) {
            (Some(verifier), _) => verifier,
            (None, Some(seconds)) => Arc::new(SecretVerifier::new(secret).with_leeway(seconds)),
            (None, None) => Arc::new(SecretVerifier::new(secret)),
        };

        let strategy = match (check_auth_middleware, check_auth) {
            (Some(middleware), _) => {
                reporter.emit(&DeprecationEvent::check_auth_middleware(&doc_link));
                AuthStrategy::FullOverride(middleware)
            }
            (None, Some(callback)) => AuthStrategy::Callback(callback),
            (None, None) => AuthStrategy::Default,
        };

        tracing::debug!(strategy = strategy.name(), "auth strategy selected");

        Self {
            inner: Arc::new(ResolverInner {
                strategy,
                verifier,
                reporter,
                doc_link,
            }),
        }
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.inner.strategy
    }

    /// Authenticate `request` and pass it on to `next`.
    ///
    /// `next` runs exactly once unless authentication fails, in which case
    /// the error response is returned instead.
    pub async fn handle(&self, request: Request, next: Next) -> Response {
        let mut request = AuthRequest::new(request);
        let next = Continuation::new(next);

        if let AuthStrategy::FullOverride(middleware) = &self.inner.strategy {
            return middleware.call(request, next).await;
        }

        match self.authenticate(&mut request).await {
            Ok(()) => next.run(request).await,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    strategy = self.inner.strategy.name(),
                    "request authentication failed"
                );
                err.into_response()
            }
        }
    }

    /// Run the default or callback strategy against `request`.
    ///
    /// The full override is not handled here since it drives the rest of
    /// the chain itself.
    pub async fn authenticate(&self, request: &mut AuthRequest) -> Result<(), AuthError> {
        match &self.inner.strategy {
            AuthStrategy::Default => {
                let Some(credential) = request.credential()? else {
                    return Ok(());
                };
                let claims = self.inner.verifier.verify(credential)?;
                request.set_security_context(claims);
                Ok(())
            }
            AuthStrategy::Callback(callback) => {
                let credential = request.credential()?.map(str::to_owned);
                callback.check(request, credential.as_deref()).await?;

                if request.security_context().is_none() && request.auth_info().is_some() {
                    self.inner
                        .reporter
                        .emit(&DeprecationEvent::auth_info(&self.inner.doc_link));
                }
                Ok(())
            }
            AuthStrategy::FullOverride(_) => Err(AuthError::InternalError(
                "checkAuthMiddleware must be driven through the middleware chain".to_string(),
            )),
        }
    }
}
