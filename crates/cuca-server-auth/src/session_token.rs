// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session tokens signed by this server (HS256).

use chrono::{Duration, Utc};
use cuca_common_secret::SecretString;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use crate::error::AuthError;
use crate::principal::{AuthMethod, Principal};

/// Default lifetime of a session token.
pub const SESSION_TOKEN_TTL_HOURS: i64 = 12;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
	pub uid: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub admin: bool,
	/// Issued at (seconds since epoch).
	pub iat: i64,
	/// Expiry (seconds since epoch).
	pub exp: i64,
}

/// Issues and verifies session tokens with the server secret.
#[derive(Clone)]
pub struct SessionTokens {
	encoding: EncodingKey,
	decoding: DecodingKey,
	ttl: Duration,
}

impl fmt::Debug for SessionTokens {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionTokens")
			.field("ttl", &self.ttl)
			.finish_non_exhaustive()
	}
}

impl SessionTokens {
	pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
			ttl: Duration::hours(ttl_hours),
		}
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Sign a token for `uid` valid from now for the configured lifetime.
	#[instrument(skip(self, email), fields(uid = %uid))]
	pub fn issue(&self, uid: &str, email: &str, admin: bool) -> Result<String, AuthError> {
		let iat = Utc::now().timestamp();
		let claims = SessionClaims {
			uid: uid.to_string(),
			email: email.to_string(),
			admin,
			iat,
			exp: iat + self.ttl.num_seconds(),
		};
		let token = self.sign(&claims)?;
		debug!(exp = claims.exp, "issued session token");
		Ok(token)
	}

	/// Sign arbitrary claims.
	pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
		encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
			.map_err(|e| AuthError::Signing(e.to_string()))
	}

	/// Check signature and expiry, returning the principal the claims describe.
	#[instrument(level = "debug", skip_all)]
	pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.set_required_spec_claims(&["exp"]);

		let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| {
			debug!(error = %e, "session token rejected");
			match e.kind() {
				ErrorKind::ExpiredSignature => AuthError::TokenExpired,
				_ => AuthError::InvalidToken,
			}
		})?;

		let claims = data.claims;
		Ok(Principal {
			uid: claims.uid,
			email: Some(claims.email),
			admin: claims.admin,
			email_verified: None,
			method: AuthMethod::Jwt,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::classify::{classify_token, TokenKind};

	fn tokens() -> SessionTokens {
		SessionTokens::new(&SecretString::from("test-session-secret"), SESSION_TOKEN_TTL_HOURS)
	}

	#[test]
	fn issued_token_verifies_to_claims() {
		let tokens = tokens();
		let token = tokens.issue("u1", "guest@example.com", false).unwrap();
		let principal = tokens.verify(&token).unwrap();
		assert_eq!(principal.uid, "u1");
		assert_eq!(principal.email.as_deref(), Some("guest@example.com"));
		assert!(!principal.admin);
		assert_eq!(principal.method, AuthMethod::Jwt);
	}

	#[test]
	fn issued_token_classifies_as_local() {
		let token = tokens().issue("u1", "guest@example.com", false).unwrap();
		assert_eq!(classify_token(&token), TokenKind::Local);
	}

	#[test]
	fn admin_claim_round_trips() {
		let tokens = tokens();
		let token = tokens.issue("root", "root@example.com", true).unwrap();
		assert!(tokens.verify(&token).unwrap().admin);
	}

	#[test]
	fn lifetime_is_twelve_hours() {
		let tokens = tokens();
		let token = tokens.issue("u1", "guest@example.com", false).unwrap();
		let claims = crate::classify::decode_claims(&token).unwrap();
		let iat = claims["iat"].as_i64().unwrap();
		let exp = claims["exp"].as_i64().unwrap();
		assert_eq!(exp - iat, 12 * 60 * 60);
	}

	#[test]
	fn expired_token_is_rejected() {
		let tokens = tokens();
		let iat = Utc::now().timestamp() - 20 * 60 * 60;
		let token = tokens
			.sign(&SessionClaims {
				uid: "u1".to_string(),
				email: "guest@example.com".to_string(),
				admin: false,
				iat,
				exp: iat + 12 * 60 * 60,
			})
			.unwrap();
		assert!(matches!(tokens.verify(&token), Err(AuthError::TokenExpired)));
	}

	#[test]
	fn wrong_secret_is_rejected() {
		let other = SessionTokens::new(&SecretString::from("another-secret"), 12);
		let token = other.issue("u1", "guest@example.com", true).unwrap();
		assert!(matches!(tokens().verify(&token), Err(AuthError::InvalidToken)));
	}

	#[test]
	fn debug_hides_keys() {
		let debug = format!("{:?}", tokens());
		assert!(!debug.contains("test-session-secret"));
	}
}
