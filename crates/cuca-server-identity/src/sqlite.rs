// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed identity provider.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cuca_common_secret::SecretString;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::argon2_config::argon2_instance;
use crate::custom_token::CustomTokenSigner;
use crate::error::IdentityError;
use crate::provider::IdentityProvider;
use crate::types::{UserRecord, UserUpdate};

/// Shortest password `create_user` accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

const USER_COLUMNS: &str =
	"uid, email, email_verified, display_name, photo_url, disabled, admin, created_at";

/// Create the provider's tables. Idempotent.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), IdentityError> {
	let m1 = include_str!("../migrations/001_create_identity_users.sql");
	if let Err(e) = sqlx::query(m1).execute(pool).await {
		if !e.to_string().contains("already exists") {
			return Err(e.into());
		}
	}
	Ok(())
}

/// Identity provider storing accounts in the `identity_users` table.
#[derive(Clone)]
pub struct SqliteIdentityProvider {
	pool: SqlitePool,
	tokens: CustomTokenSigner,
}

impl SqliteIdentityProvider {
	/// # Arguments
	/// * `pool` - SQLite connection pool (migrations already applied)
	/// * `token_secret` - key for signing custom tokens
	/// * `token_ttl_secs` - lifetime of issued custom tokens
	pub fn new(pool: SqlitePool, token_secret: &SecretString, token_ttl_secs: i64) -> Self {
		Self {
			pool,
			tokens: CustomTokenSigner::new(token_secret, token_ttl_secs),
		}
	}

	/// Sign a custom token that also carries developer claims.
	///
	/// The extra claims are informational only; verification resolves the
	/// account from `uid` and ignores them.
	#[tracing::instrument(skip(self, claims))]
	pub async fn create_custom_token_with_claims(
		&self,
		uid: &str,
		claims: Option<serde_json::Value>,
	) -> Result<String, IdentityError> {
		let user = self.get_user(uid).await?;
		let mut token_claims = self.tokens.claims_for(&user.uid);
		token_claims.claims = claims;
		let token = self.tokens.sign(&token_claims)?;
		tracing::debug!(uid = %user.uid, exp = token_claims.exp, "custom token issued");
		Ok(token)
	}

	async fn fetch_password_hash(
		&self,
		email: &str,
	) -> Result<Option<(UserRecord, String)>, IdentityError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS}, password_hash FROM identity_users WHERE email = ?"
		))
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => {
				let hash: String = row.try_get("password_hash")?;
				Ok(Some((parse_user_row(&row)?, hash)))
			}
			None => Ok(None),
		}
	}
}

fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), IdentityError> {
	match email.split_once('@') {
		Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
		_ => Err(IdentityError::InvalidEmail),
	}
}

fn hash_password(password: &SecretString) -> Result<String, IdentityError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| IdentityError::Hashing(e.to_string()))
}

fn password_matches(password: &SecretString, hash: &str) -> Result<bool, IdentityError> {
	let parsed =
		PasswordHash::new(hash).map_err(|_| IdentityError::Hashing("invalid stored hash".into()))?;
	Ok(argon2_instance()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok())
}

fn parse_user_row(row: &SqliteRow) -> Result<UserRecord, IdentityError> {
	let created_at: String = row.try_get("created_at")?;
	let created_at = DateTime::parse_from_rfc3339(&created_at)
		.map_err(|e| IdentityError::Internal(format!("invalid created_at: {e}")))?
		.with_timezone(&Utc);

	Ok(UserRecord {
		uid: row.try_get("uid")?,
		email: row.try_get("email")?,
		email_verified: row.try_get::<i64, _>("email_verified")? != 0,
		display_name: row.try_get("display_name")?,
		photo_url: row.try_get("photo_url")?,
		disabled: row.try_get::<i64, _>("disabled")? != 0,
		admin: row.try_get::<i64, _>("admin")? != 0,
		created_at,
	})
}

#[async_trait]
impl IdentityProvider for SqliteIdentityProvider {
	#[tracing::instrument(skip(self))]
	async fn get_user(&self, uid: &str) -> Result<UserRecord, IdentityError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM identity_users WHERE uid = ?"
		))
		.bind(uid)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref()
			.map(parse_user_row)
			.transpose()?
			.ok_or(IdentityError::UserNotFound)
	}

	#[tracing::instrument(skip(self))]
	async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, IdentityError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM identity_users WHERE email = ?"
		))
		.bind(normalize_email(email))
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref()
			.map(parse_user_row)
			.transpose()?
			.ok_or(IdentityError::UserNotFound)
	}

	#[tracing::instrument(skip(self, password))]
	async fn create_user(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<UserRecord, IdentityError> {
		let email = normalize_email(email);
		validate_email(&email)?;
		if password.expose().chars().count() < MIN_PASSWORD_LEN {
			return Err(IdentityError::WeakPassword(MIN_PASSWORD_LEN));
		}

		let uid = Uuid::new_v4().simple().to_string();
		let password_hash = hash_password(password)?;
		let now = Utc::now();

		let result = sqlx::query(
			r#"
			INSERT INTO identity_users (uid, email, password_hash, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(&uid)
		.bind(&email)
		.bind(&password_hash)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await;

		if let Err(e) = result {
			if e.to_string().contains("UNIQUE constraint failed") {
				return Err(IdentityError::EmailAlreadyExists);
			}
			return Err(e.into());
		}

		tracing::info!(uid = %uid, "user created");
		self.get_user(&uid).await
	}

	#[tracing::instrument(skip(self, update))]
	async fn update_user(&self, uid: &str, update: UserUpdate) -> Result<UserRecord, IdentityError> {
		let result = sqlx::query(
			r#"
			UPDATE identity_users
			SET display_name = COALESCE(?, display_name),
			    photo_url = COALESCE(?, photo_url)
			WHERE uid = ?
			"#,
		)
		.bind(update.display_name)
		.bind(update.photo_url)
		.bind(uid)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound);
		}
		self.get_user(uid).await
	}

	#[tracing::instrument(skip(self))]
	async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
		let result = sqlx::query("DELETE FROM identity_users WHERE uid = ?")
			.bind(uid)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound);
		}
		tracing::info!(uid = %uid, "user deleted");
		Ok(())
	}

	#[tracing::instrument(skip(self, password))]
	async fn verify_password(
		&self,
		email: &str,
		password: &SecretString,
	) -> Result<UserRecord, IdentityError> {
		let Some((user, hash)) = self.fetch_password_hash(&normalize_email(email)).await? else {
			tracing::debug!("login for unknown email");
			return Err(IdentityError::InvalidCredentials);
		};

		if !password_matches(password, &hash)? {
			tracing::debug!(uid = %user.uid, "password mismatch");
			return Err(IdentityError::InvalidCredentials);
		}
		if user.disabled {
			return Err(IdentityError::UserDisabled);
		}
		Ok(user)
	}

	async fn create_custom_token(&self, uid: &str) -> Result<String, IdentityError> {
		self.create_custom_token_with_claims(uid, None).await
	}

	#[tracing::instrument(skip_all)]
	async fn verify_custom_token(&self, token: &str) -> Result<UserRecord, IdentityError> {
		let claims = self.tokens.verify(token)?;
		let user = self.get_user(&claims.uid).await?;
		if user.disabled {
			return Err(IdentityError::UserDisabled);
		}
		Ok(user)
	}

	#[tracing::instrument(skip(self))]
	async fn set_admin(&self, uid: &str, admin: bool) -> Result<UserRecord, IdentityError> {
		let result = sqlx::query("UPDATE identity_users SET admin = ? WHERE uid = ?")
			.bind(i64::from(admin))
			.bind(uid)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(IdentityError::UserNotFound);
		}
		tracing::info!(uid = %uid, admin, "admin flag changed");
		self.get_user(uid).await
	}
}
