// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cuca_server_db::DocumentStore;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Instant};
use utoipa::ToSchema;

use crate::api::AppState;

/// Health status for components and overall system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

/// Document store health.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub version: String,
	pub database: DatabaseHealth,
}

const DB_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

pub async fn check_database(store: &dyn DocumentStore) -> DatabaseHealth {
	let start = Instant::now();

	let result = timeout(DB_CHECK_TIMEOUT, store.ping()).await;
	let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

	match result {
		Ok(Ok(())) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Ok(Err(e)) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some(e.to_string()),
		},
		Err(_) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some("database health check timed out".to_string()),
		},
	}
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Document store probe.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = check_database(state.store.as_ref()).await;
	let status = database.status;

	let code = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => {
			tracing::warn!(error = ?database.error, "health check failed");
			StatusCode::SERVICE_UNAVAILABLE
		}
	};

	(
		code,
		Json(HealthResponse {
			status,
			version: env!("CARGO_PKG_VERSION").to_string(),
			database,
		}),
	)
}
