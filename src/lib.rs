// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway Auth - credential verification and security context resolution
//!
//! This crate turns the bearer credential of an inbound request into a
//! verified, normalized security context that downstream handlers and query
//! planning can trust.
//!
//! ## Modules
//!
//! - `auth` - Verification strategies, axum middleware and request context
//! - `config` - Environment configuration
//! - `query` - Security context coercion for query planning
//! - `telemetry` - Tracing subscriber setup

use std::{future::Future, pin::Pin};

pub mod auth;
pub mod config;
pub mod query;
pub mod telemetry;

/// Boxed, sendable future used by the pluggable authentication hooks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
