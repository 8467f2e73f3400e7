// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session token and cookie configuration.

use cuca_common_secret::SecretString;
use serde::Deserialize;

/// Signing key used outside production when none is configured.
pub const DEV_JWT_SECRET: &str = "cuca-development-session-secret";

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Deployment environment; `production` turns on the cookie `Secure` flag.
	pub environment: String,
	/// HMAC key for locally-signed session tokens.
	pub jwt_secret: SecretString,
	pub session_ttl_hours: i64,
	pub cookie_name: String,
	pub cookie_max_age_secs: i64,
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub jwt_secret: Option<SecretString>,
	#[serde(default)]
	pub session_ttl_hours: Option<i64>,
	#[serde(default)]
	pub cookie_name: Option<String>,
	#[serde(default)]
	pub cookie_max_age_secs: Option<i64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.jwt_secret.is_some() {
			self.jwt_secret = other.jwt_secret;
		}
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.cookie_name.is_some() {
			self.cookie_name = other.cookie_name;
		}
		if other.cookie_max_age_secs.is_some() {
			self.cookie_max_age_secs = other.cookie_max_age_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
			jwt_secret: self
				.jwt_secret
				.unwrap_or_else(|| SecretString::from(DEV_JWT_SECRET)),
			session_ttl_hours: self.session_ttl_hours.unwrap_or(12),
			cookie_name: self.cookie_name.unwrap_or_else(|| "session".to_string()),
			cookie_max_age_secs: self.cookie_max_age_secs.unwrap_or(60 * 60),
		}
	}
}
