// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	routing::{get, post, put},
	Router,
};
use cuca_server_auth::{SessionTokens, TokenVerifier};
use cuca_server_config::ServerConfig;
use cuca_server_db::{DocumentStore, ReservationRepository, SqliteDocumentStore};
use cuca_server_identity::{IdentityProvider, ProviderVerifier, SqliteIdentityProvider};
use cuca_server_session::{CookieSettings, SessionService};
use sqlx::sqlite::SqlitePool;
use tower_http::services::ServeDir;

use crate::{
	routes,
	typed_router::{AuthedRouter, PublicRouter},
};

/// Shared state handed to every handler.
///
/// Collaborators are built once at startup and shared behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<ServerConfig>,
	pub identity: Arc<dyn IdentityProvider>,
	pub store: Arc<dyn DocumentStore>,
	pub reservations: Arc<ReservationRepository>,
	pub verifier: TokenVerifier,
	pub sessions: Arc<SessionService>,
}

impl AppState {
	pub fn cookie_name(&self) -> &str {
		&self.config.auth.cookie_name
	}
}

/// Build the state around the SQLite-backed collaborators.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let identity: Arc<dyn IdentityProvider> = Arc::new(SqliteIdentityProvider::new(
		pool.clone(),
		&config.identity.token_secret,
		config.identity.custom_token_ttl_secs,
	));
	let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool));

	create_app_state_with(identity, store, config)
}

/// Build the state around caller-supplied collaborators.
pub fn create_app_state_with(
	identity: Arc<dyn IdentityProvider>,
	store: Arc<dyn DocumentStore>,
	config: &ServerConfig,
) -> AppState {
	let tokens = SessionTokens::new(&config.auth.jwt_secret, config.auth.session_ttl_hours);
	let verifier = TokenVerifier::new(
		tokens.clone(),
		Arc::new(ProviderVerifier::new(Arc::clone(&identity))),
	);
	let cookie = CookieSettings {
		name: config.auth.cookie_name.clone(),
		max_age_secs: config.auth.cookie_max_age_secs,
		secure: config.auth.is_production(),
	};
	let sessions = Arc::new(SessionService::new(Arc::clone(&identity), tokens, cookie));
	let reservations = Arc::new(ReservationRepository::new(
		Arc::clone(&store),
		config.database.reservations_collection.clone(),
	));

	AppState {
		config: Arc::new(config.clone()),
		identity,
		store,
		reservations,
		verifier,
		sessions,
	}
}

/// Assemble every route. Static files from `http.public_dir`, when set,
/// answer any path the API does not.
pub fn create_router(state: AppState) -> Router {
	let public = PublicRouter::new()
		.route("/health", get(routes::health::health_check))
		.route("/api", get(routes::index::welcome))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.route("/api/auth/status", get(routes::auth::status))
		.route("/api/auth/register", post(routes::auth::register))
		.route("/api/auth/login", post(routes::auth::login))
		.build();

	let authed = AuthedRouter::new()
		.route("/api/protected", get(routes::index::protected))
		.route("/api/auth/logout", post(routes::auth::logout))
		.route(
			"/api/auth/me",
			get(routes::auth::get_me).put(routes::auth::update_me),
		)
		.route(
			"/api/reservations",
			get(routes::reservations::list_reservations)
				.post(routes::reservations::create_reservation),
		)
		.route(
			"/api/reservations/my",
			get(routes::reservations::my_reservations),
		)
		.route(
			"/api/reservations/{id}",
			put(routes::reservations::update_reservation)
				.delete(routes::reservations::delete_reservation),
		)
		.build(state.clone());

	let mut router = Router::new().merge(public).merge(authed);

	if let Some(dir) = &state.config.http.public_dir {
		tracing::info!(path = %dir.display(), "serving static files");
		router = router.fallback_service(ServeDir::new(dir));
	}

	router.with_state(state)
}
