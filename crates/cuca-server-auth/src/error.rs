// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization error types.

use thiserror::Error;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
	// =========================================================================
	// Authentication Errors
	// =========================================================================
	/// No token on the request.
	#[error("authentication required")]
	AuthenticationRequired,

	/// The token could not be decoded or its signature did not verify.
	#[error("invalid token")]
	InvalidToken,

	/// The token decoded but matches neither supported format.
	#[error("unsupported token type")]
	UnsupportedToken,

	/// The token was well-formed but has expired.
	#[error("token expired")]
	TokenExpired,

	/// Email and password did not match.
	#[error("invalid credentials")]
	InvalidCredentials,

	/// The token names a user the identity provider does not know.
	#[error("user not found")]
	UserNotFound,

	/// The user account is disabled.
	#[error("user account disabled")]
	UserDisabled,

	// =========================================================================
	// Authorization Errors
	// =========================================================================
	/// The principal does not own the reservation, or it does not exist.
	#[error("not authorized to modify this reservation")]
	AccessDenied,

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	/// The identity provider failed.
	#[error("identity provider error: {0}")]
	Upstream(String),

	/// Token signing failed.
	#[error("token signing error: {0}")]
	Signing(String),

	/// Internal error.
	#[error("internal error: {0}")]
	Internal(String),
}

impl AuthError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(
			self,
			AuthError::Upstream(_) | AuthError::Signing(_) | AuthError::Internal(_)
		)
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			// 401 Unauthorized
			AuthError::AuthenticationRequired
			| AuthError::InvalidToken
			| AuthError::UnsupportedToken
			| AuthError::TokenExpired
			| AuthError::InvalidCredentials
			| AuthError::UserNotFound
			| AuthError::UserDisabled => 401,

			// 403 Forbidden
			AuthError::AccessDenied => 403,

			// 500 Internal Server Error
			AuthError::Upstream(_) | AuthError::Signing(_) | AuthError::Internal(_) => 500,
		}
	}
}
