// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cuca booking server.
//!
//! This crate provides the HTTP API for accounts and reservations. Every
//! protected route goes through the token gate in [`auth_middleware`], and
//! reservation mutations go through the ownership check in
//! `cuca_server_auth::access`.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod commands;
pub mod db;
pub mod error;
pub mod routes;
pub mod typed_router;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use cuca_server_config::ServerConfig;
pub use error::{ErrorResponse, ServerError};
pub use typed_router::{AuthedRouter, PublicRouter};
