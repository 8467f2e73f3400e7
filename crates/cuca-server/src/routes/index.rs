// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::Json;
use cuca_server_auth::Principal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth_middleware::RequireAuth;

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
	pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProtectedResponse {
	pub message: String,
	pub user: Principal,
}

#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    ),
    tag = "general"
)]
/// GET /api - Public welcome message.
pub async fn welcome() -> Json<WelcomeResponse> {
	Json(WelcomeResponse {
		message: "Welcome to the Cuca booking API".to_string(),
	})
}

#[utoipa::path(
    get,
    path = "/api/protected",
    responses(
        (status = 200, description = "The caller's principal", body = ProtectedResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    tag = "general"
)]
/// GET /api/protected - Echo the authenticated principal.
pub async fn protected(RequireAuth(principal): RequireAuth) -> Json<ProtectedResponse> {
	Json(ProtectedResponse {
		message: "This is a protected route".to_string(),
		user: principal,
	})
}
