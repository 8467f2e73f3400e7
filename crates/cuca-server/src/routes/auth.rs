// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account and session HTTP handlers.

use axum::{
	extract::State,
	http::{header::SET_COOKIE, HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};
use cuca_common_secret::SecretString;
use cuca_server_auth::{extract_token, AuthStatus};
use cuca_server_identity::{UserRecord, UserUpdate};
use cuca_server_session::SessionError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::{ErrorResponse, ServerError},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
	pub email: String,
	#[schema(value_type = String)]
	pub password: SecretString,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
	pub uid: String,
	pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
	pub uid: String,
	pub email: String,
	pub email_verified: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	pub user: LoginUser,
	/// Session token signed by this server.
	pub token: String,
	/// Custom token from the identity provider.
	pub firebase_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
	pub success: bool,
	pub message: String,
}

/// Profile as shown to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub uid: String,
	pub email: String,
	pub email_verified: bool,
	pub display_name: Option<String>,
	#[serde(rename = "photoURL")]
	pub photo_url: Option<String>,
}

impl From<UserRecord> for ProfileResponse {
	fn from(user: UserRecord) -> Self {
		Self {
			uid: user.uid,
			email: user.email,
			email_verified: user.email_verified,
			display_name: user.display_name,
			photo_url: user.photo_url,
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/auth/status",
    responses(
        (status = 200, description = "Authentication status; never fails", body = AuthStatus)
    ),
    tag = "auth"
)]
/// GET /api/auth/status - Report whether the request carries a valid token.
pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatus> {
	let token = extract_token(&headers, state.cookie_name());
	Json(state.verifier.check_status(token.as_deref()).await)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid email, weak password or email in use", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/register - Create an account.
#[tracing::instrument(skip_all, fields(email = %body.email))]
pub async fn register(
	State(state): State<AppState>,
	Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ServerError> {
	let user = state
		.identity
		.create_user(&body.email, &body.password)
		.await
		.map_err(|e| {
			if e.is_client_error() {
				ServerError::BadRequest(e.to_string())
			} else {
				e.into()
			}
		})?;

	Ok((
		StatusCode::CREATED,
		Json(RegisterResponse {
			uid: user.uid,
			email: user.email,
		}),
	))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/login - Verify credentials, issue tokens and set the session cookie.
#[tracing::instrument(skip_all, fields(email = %body.email))]
pub async fn login(
	State(state): State<AppState>,
	Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let session = state
		.sessions
		.login(&body.email, &body.password)
		.await
		.map_err(|e| match e {
			SessionError::Identity(err) if err.is_client_error() => {
				tracing::debug!(error = %err, "login rejected");
				ServerError::Unauthorized(err.to_string())
			}
			other => other.into(),
		})?;

	let response = LoginResponse {
		user: LoginUser {
			uid: session.user.uid,
			email: session.user.email,
			email_verified: session.user.email_verified,
		},
		token: session.token,
		firebase_token: session.provider_token,
	};

	Ok(([(SET_COOKIE, session.cookie_header)], Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = LogoutResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/logout - Clear the session cookie.
pub async fn logout(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
) -> impl IntoResponse {
	tracing::info!(uid = %principal.uid, "logout");
	(
		[(SET_COOKIE, state.sessions.logout_cookie_header())],
		Json(LogoutResponse {
			success: true,
			message: "Logged out successfully".to_string(),
		}),
	)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// GET /api/auth/me - The caller's account as the identity provider sees it.
pub async fn get_me(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
) -> Result<Json<ProfileResponse>, ServerError> {
	let user = state.identity.get_user(&principal.uid).await?;
	Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// PUT /api/auth/me - Change display name or photo.
#[tracing::instrument(skip_all, fields(uid = %principal.uid))]
pub async fn update_me(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Json(update): Json<UserUpdate>,
) -> Result<Json<ProfileResponse>, ServerError> {
	let user = state.identity.update_user(&principal.uid, update).await?;
	Ok(Json(user.into()))
}
