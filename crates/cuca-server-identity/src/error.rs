// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
	#[error("user not found")]
	UserNotFound,

	#[error("the email address is already in use by another account")]
	EmailAlreadyExists,

	#[error("the email address is improperly formatted")]
	InvalidEmail,

	#[error("the password must be at least {0} characters long")]
	WeakPassword(usize),

	#[error("invalid email or password")]
	InvalidCredentials,

	#[error("user account is disabled")]
	UserDisabled,

	#[error("invalid custom token")]
	InvalidToken,

	#[error("custom token expired")]
	TokenExpired,

	#[error("password hashing error: {0}")]
	Hashing(String),

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("internal error: {0}")]
	Internal(String),
}

impl IdentityError {
	/// Errors caused by the caller's input rather than the provider itself.
	pub fn is_client_error(&self) -> bool {
		!matches!(
			self,
			IdentityError::Hashing(_) | IdentityError::Database(_) | IdentityError::Internal(_)
		)
	}
}
