// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for finding credentials on a request and carrying the result.
//!
//! # Security Notes
//!
//! - Bearer tokens are read from the `Authorization` header first
//! - The session cookie is the fallback (HttpOnly, set by the login route)
//! - Token values are never logged

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use tracing::instrument;

use crate::principal::Principal;

/// Authentication state attached to request extensions by the auth layer.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub principal: Option<Principal>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self { principal: None }
	}

	pub fn authenticated(principal: Principal) -> Self {
		Self {
			principal: Some(principal),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.principal.is_some()
	}

	/// Require authentication, returning the principal or an error.
	pub fn require_principal(&self) -> Result<&Principal, AuthRequired> {
		self.principal.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Extract a cookie value from the Cookie header.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
}

/// The request's token: the bearer header, else the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	extract_bearer_token(headers).or_else(|| extract_session_cookie_with_name(headers, cookie_name))
}
