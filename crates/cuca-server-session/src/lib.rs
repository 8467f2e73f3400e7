// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login session service for the Cuca booking server.
//!
//! Turns a verified email/password pair into the two tokens a browser client
//! needs and formats the session cookie:
//!
//! - a session token signed by this server, also set as the cookie
//! - a provider custom token for clients that talk to the provider directly

use cuca_common_secret::SecretString;
use cuca_server_auth::{AuthError, SessionTokens};
use cuca_server_identity::{IdentityError, IdentityProvider, UserRecord};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
	#[error(transparent)]
	Identity(#[from] IdentityError),

	#[error(transparent)]
	Token(#[from] AuthError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// How the session cookie is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
	pub name: String,
	pub max_age_secs: i64,
	/// Adds the `Secure` attribute; on in production.
	pub secure: bool,
}

impl CookieSettings {
	/// `Set-Cookie` value carrying `token`.
	pub fn session_cookie(&self, token: &str) -> String {
		let mut header = format!(
			"{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
			self.name, token, self.max_age_secs
		);
		if self.secure {
			header.push_str("; Secure");
		}
		header
	}

	/// `Set-Cookie` value that clears the session cookie.
	pub fn clear_cookie(&self) -> String {
		format!("{}=; Path=/; Max-Age=0", self.name)
	}
}

pub struct SessionResponse {
	pub user: UserRecord,
	/// Session token signed by this server.
	pub token: String,
	/// Custom token from the identity provider.
	pub provider_token: String,
	pub cookie_header: String,
}

pub struct SessionService {
	identity: Arc<dyn IdentityProvider>,
	tokens: SessionTokens,
	cookie: CookieSettings,
}

impl SessionService {
	pub fn new(
		identity: Arc<dyn IdentityProvider>,
		tokens: SessionTokens,
		cookie: CookieSettings,
	) -> Self {
		Self {
			identity,
			tokens,
			cookie,
		}
	}

	pub fn cookie(&self) -> &CookieSettings {
		&self.cookie
	}

	/// Verify credentials and mint the session.
	#[tracing::instrument(skip(self, password))]
	pub async fn login(&self, email: &str, password: &SecretString) -> Result<SessionResponse> {
		let user = self.identity.verify_password(email, password).await?;

		let token = self.tokens.issue(&user.uid, &user.email, user.admin)?;
		let provider_token = self.identity.create_custom_token(&user.uid).await?;
		let cookie_header = self.cookie.session_cookie(&token);

		tracing::info!(uid = %user.uid, admin = user.admin, "Session created");

		Ok(SessionResponse {
			user,
			token,
			provider_token,
			cookie_header,
		})
	}

	pub fn logout_cookie_header(&self) -> String {
		self.cookie.clear_cookie()
	}
}
