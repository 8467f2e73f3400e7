// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use cuca_reservations_core::ValidationError;
use cuca_server_auth::AuthError;
use cuca_server_db::DbError;
use cuca_server_identity::IdentityError;
use cuca_server_session::SessionError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Missing, invalid or expired credentials.
	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	/// Authenticated, but not allowed to touch the target.
	#[error("Forbidden: {0}")]
	Forbidden(String),

	/// Invalid request payload.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	#[error("Not found: {0}")]
	NotFound(String),

	/// A collaborator (identity provider, document store) failed.
	#[error("Upstream error: {0}")]
	Upstream(String),

	/// Internal server error.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl ServerError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
			ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::Upstream(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let body = match self {
			ServerError::Unauthorized(msg) => ErrorResponse::new("unauthorized", msg),
			ServerError::Forbidden(msg) => ErrorResponse::new("forbidden", msg),
			ServerError::BadRequest(msg) => ErrorResponse::new("bad_request", msg),
			ServerError::NotFound(msg) => ErrorResponse::new("not_found", msg),
			ServerError::Upstream(msg) => {
				tracing::error!(error = %msg, "upstream error");
				ErrorResponse::new("upstream_error", msg)
			}
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				ErrorResponse::new("internal_error", "An internal error occurred")
			}
		};
		(status, Json(body)).into_response()
	}
}

impl From<AuthError> for ServerError {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::AccessDenied => ServerError::Forbidden(err.to_string()),
			AuthError::Upstream(msg) => ServerError::Upstream(msg),
			AuthError::Signing(_) | AuthError::Internal(_) => ServerError::Internal(err.to_string()),
			_ => ServerError::Unauthorized(err.to_string()),
		}
	}
}

impl From<IdentityError> for ServerError {
	fn from(err: IdentityError) -> Self {
		match err {
			IdentityError::UserNotFound => ServerError::NotFound(err.to_string()),
			IdentityError::EmailAlreadyExists
			| IdentityError::InvalidEmail
			| IdentityError::WeakPassword(_) => ServerError::BadRequest(err.to_string()),
			IdentityError::InvalidCredentials
			| IdentityError::UserDisabled
			| IdentityError::InvalidToken
			| IdentityError::TokenExpired => ServerError::Unauthorized(err.to_string()),
			IdentityError::Database(_) => ServerError::Upstream(err.to_string()),
			IdentityError::Hashing(_) | IdentityError::Internal(_) => {
				ServerError::Internal(err.to_string())
			}
		}
	}
}

impl From<DbError> for ServerError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(msg) => ServerError::NotFound(msg),
			DbError::Validation(e) => e.into(),
			DbError::InvalidQuery(msg) => ServerError::BadRequest(msg),
			DbError::Sqlx(_) | DbError::Serialization(_) | DbError::Internal(_) => {
				ServerError::Internal(err.to_string())
			}
		}
	}
}

impl From<ValidationError> for ServerError {
	fn from(err: ValidationError) -> Self {
		ServerError::BadRequest(err.to_string())
	}
}

impl From<SessionError> for ServerError {
	fn from(err: SessionError) -> Self {
		match err {
			SessionError::Identity(e) => e.into(),
			SessionError::Token(e) => e.into(),
		}
	}
}
