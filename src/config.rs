// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! by the authentication layer. Configuration is loaded from the environment
//! once, when the gateway is built, and never changes afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `API_SECRET` | Shared secret for JWT signature verification | Required |
//! | `AUTH_CLOCK_SKEW_LEEWAY` | Tolerance for `exp`/`nbf`, in seconds | `60` |
//! | `DEPRECATION_DOC_URL` | Link appended to deprecation warnings | cube.js `DEPRECATION.md` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use thiserror::Error;

use crate::auth::verifier::CLOCK_SKEW_LEEWAY;

/// Environment variable name for the JWT verification secret.
pub const API_SECRET_ENV: &str = "API_SECRET";

/// Environment variable name for the clock skew tolerance.
pub const AUTH_LEEWAY_ENV: &str = "AUTH_CLOCK_SKEW_LEEWAY";

/// Environment variable name for the deprecation documentation link.
pub const DEPRECATION_DOC_URL_ENV: &str = "DEPRECATION_DOC_URL";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DEPRECATION_DOC_URL: &str =
    "https://github.com/cube-js/cube.js/blob/master/DEPRECATION.md#checkauthmiddleware";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Authentication settings read from the environment.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub leeway_seconds: u64,
    pub deprecation_doc_url: String,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(API_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(API_SECRET_ENV))?;

        let leeway_seconds = match lookup(AUTH_LEEWAY_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(AUTH_LEEWAY_ENV))?,
            None => CLOCK_SKEW_LEEWAY,
        };

        let deprecation_doc_url = lookup(DEPRECATION_DOC_URL_ENV)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DEPRECATION_DOC_URL.to_string());

        Ok(Self {
            secret,
            leeway_seconds,
            deprecation_doc_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn secret_is_required() {
        let result = AuthSettings::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing(API_SECRET_ENV));
    }

    #[test]
    fn defaults_apply() {
        let settings = AuthSettings::from_lookup(lookup(&[(API_SECRET_ENV, "secret")])).unwrap();
        assert_eq!(settings.secret, "secret");
        assert_eq!(settings.leeway_seconds, CLOCK_SKEW_LEEWAY);
        assert_eq!(settings.deprecation_doc_url, DEFAULT_DEPRECATION_DOC_URL);
    }

    #[test]
    fn leeway_must_be_numeric() {
        let result = AuthSettings::from_lookup(lookup(&[
            (API_SECRET_ENV, "secret"),
            (AUTH_LEEWAY_ENV, "soon"),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::Invalid(AUTH_LEEWAY_ENV));
    }

    #[test]
    fn overrides_are_read() {
        let settings = AuthSettings::from_lookup(lookup(&[
            (API_SECRET_ENV, "secret"),
            (AUTH_LEEWAY_ENV, " 5 "),
            (DEPRECATION_DOC_URL_ENV, "https://docs.example.com/deprecations"),
        ]))
        .unwrap();
        assert_eq!(settings.leeway_seconds, 5);
        assert_eq!(settings.deprecation_doc_url, "https://docs.example.com/deprecations");
    }
}
