// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors for reservation payloads.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("dates must contain at least one entry")]
	EmptyDates,

	#[error("hosts must be at least 1")]
	InvalidHosts,

	#[error("totalNights must equal the number of dates")]
	InvalidTotalNights,

	#[error("email is required")]
	MissingEmail,

	#[error("invalid email address: {0}")]
	InvalidEmail(String),

	#[error("id must not be empty")]
	EmptyId,
}
