// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Security context coercion for query planning.
//!
//! Query planning reads the caller's claims from
//! `contextSymbols.securityContext`. Older tokens nest them under a `u`
//! object; [`coerce_for_sql_query`] flattens that shape so planning only
//! ever sees flat claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::{Claims, RequestContext};

/// Claim key holding the legacy nested security context.
pub const LEGACY_CLAIMS_KEY: &str = "u";

/// Query as received from the client. Members other than
/// `contextSymbols` are opaque here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context_symbols: Map<String, Value>,
    #[serde(flatten)]
    pub members: Map<String, Value>,
}

/// Symbols available to query planning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSymbols {
    pub security_context: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query ready for planning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoercedQuery {
    #[serde(flatten)]
    pub members: Map<String, Value>,
    pub context_symbols: ContextSymbols,
    pub request_id: String,
}

/// Flatten claims for query planning.
///
/// Entries of a nested `u` object are lifted to the top level, where they
/// never replace an existing top-level claim, and the `u` key is dropped.
/// A `u` claim that is not an object is an ordinary claim. No claims give
/// an empty map.
pub fn flatten_security_context(claims: Option<&Claims>) -> Map<String, Value> {
    let Some(claims) = claims else {
        return Map::new();
    };

    match claims.get(LEGACY_CLAIMS_KEY) {
        Some(Value::Object(nested)) => {
            let mut flat = nested.clone();
            for (name, value) in claims.iter().filter(|(name, _)| *name != LEGACY_CLAIMS_KEY) {
                flat.insert(name.clone(), value.clone());
            }
            flat
        }
        _ => claims.as_map().clone(),
    }
}

/// Attach the flattened security context of `context` to `query`.
///
/// Pure: neither argument is modified and equal inputs give equal output,
/// so planning may call it as often as it needs.
pub fn coerce_for_sql_query(query: &QueryDescriptor, context: &RequestContext) -> CoercedQuery {
    let mut extra = query.context_symbols.clone();
    extra.remove("securityContext");

    // requestId always comes from the context
    let mut members = query.members.clone();
    members.remove("requestId");

    CoercedQuery {
        members,
        context_symbols: ContextSymbols {
            security_context: flatten_security_context(context.security_context().map(|c| &**c)),
            extra,
        },
        request_id: context.request_id().to_string(),
    }
}
