// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider-issued custom tokens.
//!
//! HS256 tokens signed with the provider's own key. The payload names a `uid`
//! and never an `email`, so the server's classifier routes them to the
//! provider. Optional developer `claims` ride along but are never trusted for
//! identity.

use chrono::Utc;
use cuca_common_secret::SecretString;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IdentityError;

pub const CUSTOM_TOKEN_ISSUER: &str = "cuca-identity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTokenClaims {
	pub uid: String,
	pub iss: String,
	pub iat: i64,
	pub exp: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub claims: Option<serde_json::Value>,
}

#[derive(Clone)]
pub(crate) struct CustomTokenSigner {
	encoding: EncodingKey,
	decoding: DecodingKey,
	ttl_secs: i64,
}

impl CustomTokenSigner {
	pub(crate) fn new(secret: &SecretString, ttl_secs: i64) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
			ttl_secs,
		}
	}

	pub(crate) fn claims_for(&self, uid: &str) -> CustomTokenClaims {
		let iat = Utc::now().timestamp();
		CustomTokenClaims {
			uid: uid.to_string(),
			iss: CUSTOM_TOKEN_ISSUER.to_string(),
			iat,
			exp: iat + self.ttl_secs,
			claims: None,
		}
	}

	pub(crate) fn sign(&self, claims: &CustomTokenClaims) -> Result<String, IdentityError> {
		encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
			.map_err(|e| IdentityError::Internal(format!("failed to sign custom token: {e}")))
	}

	pub(crate) fn verify(&self, token: &str) -> Result<CustomTokenClaims, IdentityError> {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.set_required_spec_claims(&["exp", "iss"]);
		validation.set_issuer(&[CUSTOM_TOKEN_ISSUER]);

		decode::<CustomTokenClaims>(token, &self.decoding, &validation)
			.map(|data| data.claims)
			.map_err(|e| {
				debug!(error = %e, "custom token rejected");
				match e.kind() {
					ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
					_ => IdentityError::InvalidToken,
				}
			})
	}
}
