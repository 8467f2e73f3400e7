// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use cuca_server::api::{create_app_state, create_router, AppState};
use cuca_server::ServerConfig;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::tempdir;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

/// Creates a test app with an isolated database.
pub async fn setup_test_app() -> (Router, AppState, tempfile::TempDir) {
	let (app, state, _pool, dir) = setup_test_app_with_pool().await;
	(app, state, dir)
}

/// Like [`setup_test_app`], also handing back the pool so a test can close it.
pub async fn setup_test_app_with_pool() -> (Router, AppState, SqlitePool, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = cuca_server::db::create_pool(&db_url).await.unwrap();
	cuca_server::db::run_migrations(&pool).await.unwrap();
	let config = ServerConfig::default();
	let state = create_app_state(pool.clone(), &config);
	(create_router(state.clone()), state, pool, dir)
}

pub async fn send(
	app: &Router,
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let (status, _, body) = send_raw(app, method, uri, token, body).await;
	(status, body)
}

/// Like [`send`], also returning the `Set-Cookie` header.
pub async fn send_raw(
	app: &Router,
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
	}
	let request = match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let cookie = response
		.headers()
		.get(header::SET_COOKIE)
		.map(|v| v.to_str().unwrap().to_string());
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let body = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or_else(|_| {
			Value::String(String::from_utf8_lossy(&bytes).into_owned())
		})
	};
	(status, cookie, body)
}

/// Registers an account and returns its uid.
pub async fn register(app: &Router, email: &str) -> String {
	let (status, body) = send(
		app,
		Method::POST,
		"/api/auth/register",
		None,
		Some(json!({ "email": email, "password": PASSWORD })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
	body["uid"].as_str().unwrap().to_string()
}

/// Logs in and returns the whole login response.
pub async fn login(app: &Router, email: &str) -> Value {
	let (status, body) = send(
		app,
		Method::POST,
		"/api/auth/login",
		None,
		Some(json!({ "email": email, "password": PASSWORD })),
	)
	.await;
	assert_eq!(status, StatusCode::OK, "login failed: {body}");
	body
}

/// Registers, logs in, and returns `(uid, session token)`.
pub async fn signed_in(app: &Router, email: &str) -> (String, String) {
	let uid = register(app, email).await;
	let session = login(app, email).await;
	(uid, session["token"].as_str().unwrap().to_string())
}
