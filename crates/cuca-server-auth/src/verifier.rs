// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The dual-mode verifier: one gate, two trust paths.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::classify::{classify_token, TokenKind};
use crate::error::AuthError;
use crate::principal::{AuthMethod, Principal};
use crate::session_token::SessionTokens;

/// Trust path for tokens issued by the identity provider.
///
/// Implementations must build the principal from the provider's own record
/// for the token's `uid`, never from the token payload.
#[async_trait]
pub trait ExternalVerifier: Send + Sync {
	async fn verify_external(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Result of the non-enforcing status probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthStatus {
	pub authenticated: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub method: Option<AuthMethod>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<StatusUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusUser {
	pub uid: String,
	pub email: Option<String>,
}

impl AuthStatus {
	pub fn unauthenticated() -> Self {
		Self {
			authenticated: false,
			method: None,
			user: None,
		}
	}

	pub fn from_principal(principal: &Principal) -> Self {
		Self {
			authenticated: true,
			method: Some(principal.method),
			user: Some(StatusUser {
				uid: principal.uid.clone(),
				email: principal.email.clone(),
			}),
		}
	}
}

/// Verifies bearer tokens through whichever trust path their shape selects.
#[derive(Clone)]
pub struct TokenVerifier {
	sessions: SessionTokens,
	external: Arc<dyn ExternalVerifier>,
}

impl std::fmt::Debug for TokenVerifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenVerifier")
			.field("sessions", &self.sessions)
			.finish_non_exhaustive()
	}
}

impl TokenVerifier {
	pub fn new(sessions: SessionTokens, external: Arc<dyn ExternalVerifier>) -> Self {
		Self { sessions, external }
	}

	pub fn sessions(&self) -> &SessionTokens {
		&self.sessions
	}

	/// Enforcing gate used by protected routes.
	#[instrument(level = "debug", skip_all, fields(kind))]
	pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
		let kind = classify_token(token);
		tracing::Span::current().record("kind", kind.as_str());

		match kind {
			TokenKind::Local => self.sessions.verify(token),
			TokenKind::External => self.external.verify_external(token).await,
			TokenKind::Unknown => Err(AuthError::UnsupportedToken),
			TokenKind::Invalid => Err(AuthError::InvalidToken),
		}
	}

	/// Non-enforcing probe: tries the local path, then the external one,
	/// regardless of the token's shape. Never fails.
	#[instrument(level = "debug", skip_all)]
	pub async fn check_status(&self, token: Option<&str>) -> AuthStatus {
		let Some(token) = token else {
			return AuthStatus::unauthenticated();
		};

		match self.sessions.verify(token) {
			Ok(principal) => return AuthStatus::from_principal(&principal),
			Err(e) => debug!(error = %e, "status probe: session token check failed"),
		}

		match self.external.verify_external(token).await {
			Ok(principal) => AuthStatus::from_principal(&principal),
			Err(e) => {
				debug!(error = %e, "status probe: external token check failed");
				AuthStatus::unauthenticated()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::classify::decode_claims;
	use cuca_common_secret::SecretString;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Accepts any token whose payload has a `uid` and reports a fixed email.
	#[derive(Default)]
	struct FakeProvider {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl ExternalVerifier for FakeProvider {
		async fn verify_external(&self, token: &str) -> Result<Principal, AuthError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			let claims = decode_claims(token).ok_or(AuthError::InvalidToken)?;
			let uid = claims
				.get("uid")
				.and_then(|v| v.as_str())
				.ok_or(AuthError::InvalidToken)?;
			if uid == "ghost" {
				return Err(AuthError::UserNotFound);
			}
			Ok(Principal {
				uid: uid.to_string(),
				email: Some("provider@example.com".to_string()),
				admin: false,
				email_verified: Some(true),
				method: AuthMethod::Firebase,
			})
		}
	}

	fn external_token(uid: &str) -> String {
		use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
		let payload = serde_json::json!({ "uid": uid }).to_string();
		format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
	}

	fn verifier() -> (TokenVerifier, Arc<FakeProvider>) {
		let provider = Arc::new(FakeProvider::default());
		let sessions = SessionTokens::new(&SecretString::from("gate-secret"), 12);
		(TokenVerifier::new(sessions, provider.clone()), provider)
	}

	#[tokio::test]
	async fn local_token_uses_session_path() {
		let (verifier, provider) = verifier();
		let token = verifier
			.sessions()
			.issue("u1", "guest@example.com", false)
			.unwrap();
		let principal = verifier.authenticate(&token).await.unwrap();
		assert_eq!(principal.method, AuthMethod::Jwt);
		assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn external_token_uses_provider_path() {
		let (verifier, _) = verifier();
		let principal = verifier.authenticate(&external_token("u9")).await.unwrap();
		assert_eq!(principal.uid, "u9");
		assert_eq!(principal.method, AuthMethod::Firebase);
	}

	#[tokio::test]
	async fn garbage_is_rejected_without_calling_provider() {
		let (verifier, provider) = verifier();
		let err = verifier.authenticate("not-a-token").await.unwrap_err();
		assert!(matches!(err, AuthError::InvalidToken));
		assert_eq!(err.status_code(), 401);
		assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn unknown_shape_is_rejected() {
		use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
		let (verifier, _) = verifier();
		let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(r#"{"sub":"x"}"#));
		let err = verifier.authenticate(&token).await.unwrap_err();
		assert!(matches!(err, AuthError::UnsupportedToken));
	}

	#[tokio::test]
	async fn status_without_token() {
		let (verifier, _) = verifier();
		assert_eq!(verifier.check_status(None).await, AuthStatus::unauthenticated());
	}

	#[tokio::test]
	async fn status_reports_method() {
		let (verifier, _) = verifier();
		let token = verifier
			.sessions()
			.issue("u1", "guest@example.com", false)
			.unwrap();
		let status = verifier.check_status(Some(&token)).await;
		assert!(status.authenticated);
		assert_eq!(status.method, Some(AuthMethod::Jwt));

		let status = verifier.check_status(Some(&external_token("u2"))).await;
		assert_eq!(status.method, Some(AuthMethod::Firebase));
		assert_eq!(status.user.unwrap().email.as_deref(), Some("provider@example.com"));
	}

	#[tokio::test]
	async fn status_tries_both_paths_before_giving_up() {
		let (verifier, provider) = verifier();
		let status = verifier.check_status(Some("garbage")).await;
		assert!(!status.authenticated);
		assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

		let status = verifier.check_status(Some(&external_token("ghost"))).await;
		assert!(!status.authenticated);
	}

	#[test]
	fn unauthenticated_status_serializes_minimal() {
		let json = serde_json::to_value(AuthStatus::unauthenticated()).unwrap();
		assert_eq!(json, serde_json::json!({ "authenticated": false }));
	}
}
