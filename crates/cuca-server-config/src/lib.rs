// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Cuca booking server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CUCA_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use cuca_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	load_secret_env, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub identity: IdentityConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CUCA_SERVER_*`)
/// 2. Config file (`/etc/cuca/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	validate_layer(&layer)?;

	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let identity = layer.identity.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth, &identity)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		collection = %database.reservations_collection,
		environment = %auth.environment,
		static_ui = http.public_dir.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		identity,
		logging,
	})
}

/// Rules that depend on whether a value was supplied at all, checked before defaults apply.
fn validate_layer(layer: &ServerConfigLayer) -> Result<(), ConfigError> {
	let auth = layer.auth.as_ref();
	let production = auth
		.and_then(|a| a.environment.as_deref())
		.is_some_and(|env| env.eq_ignore_ascii_case("production"));
	if !production {
		return Ok(());
	}

	let jwt_secret_set = auth
		.and_then(|a| a.jwt_secret.as_ref())
		.is_some_and(|s| !s.is_empty());
	if !jwt_secret_set {
		return Err(ConfigError::Validation(
			"CUCA_SERVER_JWT_SECRET must be set when CUCA_SERVER_ENV=production".to_string(),
		));
	}

	let token_secret_set = layer
		.identity
		.as_ref()
		.and_then(|i| i.token_secret.as_ref())
		.is_some_and(|s| !s.is_empty());
	if !token_secret_set {
		return Err(ConfigError::Validation(
			"CUCA_SERVER_IDENTITY_TOKEN_SECRET must be set when CUCA_SERVER_ENV=production"
				.to_string(),
		));
	}

	Ok(())
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig, identity: &IdentityConfig) -> Result<(), ConfigError> {
	if auth.jwt_secret == identity.token_secret {
		return Err(ConfigError::Validation(
			"session signing secret and identity token secret must differ".to_string(),
		));
	}
	if auth.session_ttl_hours <= 0 {
		return Err(ConfigError::InvalidValue {
			key: "auth.session_ttl_hours".to_string(),
			message: "must be positive".to_string(),
		});
	}
	if auth.cookie_max_age_secs < 0 {
		return Err(ConfigError::InvalidValue {
			key: "auth.cookie_max_age_secs".to_string(),
			message: "must not be negative".to_string(),
		});
	}
	if identity.custom_token_ttl_secs <= 0 {
		return Err(ConfigError::InvalidValue {
			key: "identity.custom_token_ttl_secs".to_string(),
			message: "must be positive".to_string(),
		});
	}

	Ok(())
}
