// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database setup shared by the server binary and its tests.

use sqlx::sqlite::SqlitePool;

use crate::error::ServerError;

pub use cuca_server_db::create_pool;

/// Create the document and identity tables.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), ServerError> {
	cuca_server_db::run_migrations(pool).await?;
	cuca_server_identity::run_migrations(pool).await?;
	tracing::debug!("migrations applied");
	Ok(())
}
