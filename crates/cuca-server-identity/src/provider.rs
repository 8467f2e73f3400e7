// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use cuca_common_secret::SecretString;

use crate::error::IdentityError;
use crate::types::{UserRecord, UserUpdate};

/// User accounts and provider-issued tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	async fn get_user(&self, uid: &str) -> Result<UserRecord, IdentityError>;

	async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, IdentityError>;

	/// Register a new account. The email must be unused.
	async fn create_user(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<UserRecord, IdentityError>;

	async fn update_user(&self, uid: &str, update: UserUpdate)
		-> Result<UserRecord, IdentityError>;

	async fn delete_user(&self, uid: &str) -> Result<(), IdentityError>;

	/// Check an email/password pair. Unknown email and wrong password look the same.
	async fn verify_password(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<UserRecord, IdentityError>;

	/// Sign a token naming `uid`.
	async fn create_custom_token(&self, uid: &str) -> Result<String, IdentityError>;

	/// Check a token's signature and expiry, then resolve its `uid`.
	async fn verify_custom_token(&self, token: &str) -> Result<UserRecord, IdentityError>;

	async fn set_admin(&self, uid: &str, admin: bool) -> Result<UserRecord, IdentityError>;
}
