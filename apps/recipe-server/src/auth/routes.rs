// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route protection metadata.
//!
//! The filter never inspects routing internals itself; it asks a
//! [`RouteMetadata`] whether the matched route carries a tag.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{MatchedPath, Request},
    http::Method,
};

/// Query against the routing layer.
pub trait RouteMetadata: Send + Sync {
    /// Whether the route matched for `request` is tagged with `tag`.
    fn has_tag(&self, request: &Request, tag: &str) -> bool;
}

impl<F> RouteMetadata for F
where
    F: Fn(&Request, &str) -> bool + Send + Sync,
{
    fn has_tag(&self, request: &Request, tag: &str) -> bool {
        self(request, tag)
    }
}

/// Tags declared per `(method, path pattern)` when routes are registered.
///
/// Lookups use axum's [`MatchedPath`], so the filter must run as a
/// `route_layer`. Requests without a matched path carry no tags.
#[derive(Debug, Clone, Default)]
pub struct RouteTags {
    tags: HashMap<(Method, String), HashSet<String>>,
}

impl RouteTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `tag` to `method path`.
    pub fn tag(mut self, method: Method, path: impl Into<String>, tag: impl Into<String>) -> Self {
        self.insert(method, path, tag);
        self
    }

    pub fn insert(&mut self, method: Method, path: impl Into<String>, tag: impl Into<String>) {
        self.tags
            .entry((method, path.into()))
            .or_default()
            .insert(tag.into());
    }

    /// Whether `method path` was declared with `tag`.
    pub fn contains(&self, method: &Method, path: &str, tag: &str) -> bool {
        self.tags
            .get(&(method.clone(), path.to_string()))
            .is_some_and(|tags| tags.contains(tag))
    }
}

impl RouteMetadata for RouteTags {
    fn has_tag(&self, request: &Request, tag: &str) -> bool {
        // axum serves HEAD with the GET handler of the same route.
        let method = if *request.method() == Method::HEAD {
            Method::GET
        } else {
            request.method().clone()
        };
        request
            .extensions()
            .get::<MatchedPath>()
            .is_some_and(|matched| self.contains(&method, matched.as_str(), tag))
    }
}
