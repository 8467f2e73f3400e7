// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Plugs the identity provider into the server's token gate.

use async_trait::async_trait;
use cuca_server_auth::{AuthError, AuthMethod, ExternalVerifier, Principal};
use std::sync::Arc;

use crate::error::IdentityError;
use crate::provider::IdentityProvider;
use crate::types::UserRecord;

/// Verifies provider-issued tokens. The principal comes from the resolved
/// account, never from the token payload.
#[derive(Clone)]
pub struct ProviderVerifier {
	provider: Arc<dyn IdentityProvider>,
}

impl ProviderVerifier {
	pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
		Self { provider }
	}
}

/// Principal for an account resolved by the provider.
pub fn principal_from_record(record: &UserRecord) -> Principal {
	Principal {
		uid: record.uid.clone(),
		email: Some(record.email.clone()),
		admin: record.admin,
		email_verified: Some(record.email_verified),
		method: AuthMethod::Firebase,
	}
}

pub fn identity_to_auth_error(err: IdentityError) -> AuthError {
	match err {
		IdentityError::UserNotFound => AuthError::UserNotFound,
		IdentityError::UserDisabled => AuthError::UserDisabled,
		IdentityError::TokenExpired => AuthError::TokenExpired,
		IdentityError::InvalidToken => AuthError::InvalidToken,
		IdentityError::InvalidCredentials => AuthError::InvalidCredentials,
		other => AuthError::Upstream(other.to_string()),
	}
}

#[async_trait]
impl ExternalVerifier for ProviderVerifier {
	async fn verify_external(&self, token: &str) -> Result<Principal, AuthError> {
		let record = self
			.provider
			.verify_custom_token(token)
			.await
			.map_err(identity_to_auth_error)?;
		Ok(principal_from_record(&record))
	}
}
