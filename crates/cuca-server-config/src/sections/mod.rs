// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for cuca-server.

pub mod auth;
pub mod database;
pub mod http;
pub mod identity;
pub mod logging;

pub use auth::{AuthConfig, AuthConfigLayer, DEV_JWT_SECRET};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use identity::{IdentityConfig, IdentityConfigLayer, DEV_IDENTITY_TOKEN_SECRET};
pub use logging::{LoggingConfig, LoggingConfigLayer};
