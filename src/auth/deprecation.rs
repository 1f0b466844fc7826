// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deprecation diagnostics for legacy authentication hooks.
//!
//! Events are dispatched synchronously to a [`DeprecationSink`] at the call
//! site where the deprecated path is entered. The reporter never fails: a
//! sink error or panic is logged and dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

pub const AUTH_INFO_DEPRECATION: &str = "AuthInfo Deprecation";
pub const CHECK_AUTH_MIDDLEWARE_DEPRECATION: &str = "CheckAuthMiddleware Middleware Deprecation";

/// Failure reported by a deprecation sink.
#[derive(Debug, Error)]
#[error("deprecation sink failed: {0}")]
pub struct SinkError(pub String);

/// Destination for deprecation diagnostics (the gateway logger).
pub trait DeprecationSink: Send + Sync {
    fn log(&self, message: &str, metadata: &Value) -> Result<(), SinkError>;
}

impl<F> DeprecationSink for F
where
    F: Fn(&str, &Value) -> Result<(), SinkError> + Send + Sync,
{
    fn log(&self, message: &str, metadata: &Value) -> Result<(), SinkError> {
        self(message, metadata)
    }
}

/// Default sink: a `warn` level tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DeprecationSink for TracingSink {
    fn log(&self, message: &str, metadata: &Value) -> Result<(), SinkError> {
        tracing::warn!(target: "deprecation", %metadata, "{message}");
        Ok(())
    }
}

/// A single deprecation diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct DeprecationEvent {
    pub message: &'static str,
    pub metadata: Value,
}

impl DeprecationEvent {
    /// A `checkAuth` callback stored its result under the legacy `authInfo` name.
    pub fn auth_info(doc_link: &str) -> Self {
        Self {
            message: AUTH_INFO_DEPRECATION,
            metadata: json!({
                "warning": format!(
                    "authInfo was renamed to securityContext, please migrate: {doc_link}"
                ),
            }),
        }
    }

    /// The gateway was configured with a `checkAuthMiddleware` override.
    pub fn check_auth_middleware(doc_link: &str) -> Self {
        Self {
            message: CHECK_AUTH_MIDDLEWARE_DEPRECATION,
            metadata: json!({
                "warning": format!(
                    "Option checkAuthMiddleware is now deprecated in favor of checkAuth, please migrate: {doc_link}"
                ),
            }),
        }
    }
}

/// Forwards deprecation events to the configured sink.
#[derive(Clone)]
pub struct DeprecationReporter {
    sink: Arc<dyn DeprecationSink>,
}

impl DeprecationReporter {
    pub fn new(sink: Arc<dyn DeprecationSink>) -> Self {
        Self { sink }
    }

    /// Reporter backed by [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Send one diagnostic to the sink. Never fails.
    pub fn report(&self, message: &str, metadata: &Value) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.sink.log(message, metadata)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(error = %err, event = message, "deprecation sink rejected event");
            }
            Err(_) => {
                tracing::warn!(event = message, "deprecation sink panicked");
            }
        }
    }

    pub fn emit(&self, event: &DeprecationEvent) {
        self.report(event.message, &event.metadata);
    }
}

impl Default for DeprecationReporter {
    fn default() -> Self {
        Self::tracing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{RecordingSink, DOC_LINK};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn auth_info_event_matches_gateway_wording() {
        let event = DeprecationEvent::auth_info(DOC_LINK);
        assert_eq!(event.message, "AuthInfo Deprecation");
        assert_eq!(
            event.metadata,
            json!({
                "warning": "authInfo was renamed to securityContext, please migrate: https://github.com/cube-js/cube.js/blob/master/DEPRECATION.md#checkauthmiddleware"
            })
        );
    }

    #[test]
    fn check_auth_middleware_event_matches_gateway_wording() {
        let event = DeprecationEvent::check_auth_middleware(DOC_LINK);
        assert_eq!(event.message, "CheckAuthMiddleware Middleware Deprecation");
        assert_eq!(
            event.metadata["warning"],
            "Option checkAuthMiddleware is now deprecated in favor of checkAuth, please migrate: https://github.com/cube-js/cube.js/blob/master/DEPRECATION.md#checkauthmiddleware"
        );
    }

    #[test]
    fn report_forwards_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = DeprecationReporter::new(sink.clone());

        reporter.emit(&DeprecationEvent::auth_info(DOC_LINK));

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, AUTH_INFO_DEPRECATION);
    }

    #[test]
    fn sink_error_is_absorbed() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = attempts.clone();
        let failing = move |_: &str, _: &Value| -> Result<(), SinkError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Err(SinkError("disk full".into()))
        };
        let reporter = DeprecationReporter::new(Arc::new(failing));

        reporter.emit(&DeprecationEvent::auth_info(DOC_LINK));
        reporter.emit(&DeprecationEvent::auth_info(DOC_LINK));

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sink_panic_is_absorbed() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = attempts.clone();
        let panicking = move |_: &str, _: &Value| -> Result<(), SinkError> {
            seen.fetch_add(1, Ordering::SeqCst);
            panic!("logger exploded")
        };
        let reporter = DeprecationReporter::new(Arc::new(panicking));

        reporter.emit(&DeprecationEvent::check_auth_middleware(DOC_LINK));
        reporter.emit(&DeprecationEvent::check_auth_middleware(DOC_LINK));

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_reporter_logs_through_tracing() {
        let reporter = DeprecationReporter::default();
        reporter.emit(&DeprecationEvent::auth_info(DOC_LINK));
        assert!(TracingSink.log(AUTH_INFO_DEPRECATION, &json!({})).is_ok());
    }
}
