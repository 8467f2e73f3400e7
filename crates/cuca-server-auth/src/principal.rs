// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authenticated caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which trust path produced a [`Principal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
	/// Session token signed by this server.
	Jwt,
	/// Token issued by the identity provider.
	Firebase,
}

impl fmt::Display for AuthMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthMethod::Jwt => f.write_str("jwt"),
			AuthMethod::Firebase => f.write_str("firebase"),
		}
	}
}

/// Identity attached to an authenticated request. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Principal {
	pub uid: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default)]
	pub admin: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
	pub method: AuthMethod,
}

impl Principal {
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}
}
