// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! E2E REST server - token-authenticated user API
//!
//! Users register, exchange email and password for an HS256 bearer token, and
//! use that token against the protected endpoints. A user may only modify or
//! delete its own record.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, validation and request gating
//! - `config` - Environment configuration
//! - `store` - In-memory user storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
