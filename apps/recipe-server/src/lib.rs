// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recipe Server - recipe backend with stateless JWT authentication
//!
//! Routes tagged at router construction are guarded by a bearer-token
//! filter; everything else is public.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWT center, auth filter, social login verification
//! - `config` - Environment configuration
//! - `store` - In-memory recipe and user store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
