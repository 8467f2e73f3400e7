// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider configuration.

use cuca_common_secret::SecretString;
use serde::Deserialize;

/// Provider signing key used outside production when none is configured.
pub const DEV_IDENTITY_TOKEN_SECRET: &str = "cuca-development-identity-secret";

#[derive(Debug, Clone)]
pub struct IdentityConfig {
	/// Key the provider signs its custom tokens with.
	pub token_secret: SecretString,
	pub custom_token_ttl_secs: i64,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		IdentityConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub token_secret: Option<SecretString>,
	#[serde(default)]
	pub custom_token_ttl_secs: Option<i64>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: IdentityConfigLayer) {
		if other.token_secret.is_some() {
			self.token_secret = other.token_secret;
		}
		if other.custom_token_ttl_secs.is_some() {
			self.custom_token_ttl_secs = other.custom_token_ttl_secs;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		IdentityConfig {
			token_secret: self
				.token_secret
				.unwrap_or_else(|| SecretString::from(DEV_IDENTITY_TOKEN_SECRET)),
			custom_token_ttl_secs: self.custom_token_ttl_secs.unwrap_or(60 * 60),
		}
	}
}
