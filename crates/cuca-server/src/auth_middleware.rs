// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] reads the bearer token (or the session cookie), runs it
//! through the dual-mode verifier and stores the resulting [`AuthContext`] as
//! a request extension. Handlers then take a [`RequireAuth`] extractor:
//!
//! ```ignore
//! async fn handler(RequireAuth(principal): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.uid)
//! }
//! ```
//!
//! # Security
//!
//! - Raw tokens are never logged
//! - Rejection reasons are logged at debug level and never returned
//! - Identity provider failures are answered with a 500, not a 401
//! - The principal is rebuilt on every request

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use cuca_server_auth::{extract_token, AuthContext, Principal};
use tracing::instrument;

use crate::{api::AppState, error::ServerError};

/// Authentication middleware that extracts auth context from requests.
///
/// Never rejects a bad token on its own; [`crate::typed_router::require_auth_layer`]
/// turns an unauthenticated context into a 401. Verification that could not
/// run (provider or store down) short-circuits with the mapped server error.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		uid = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let span = tracing::Span::current();

	let auth_ctx = match extract_token(request.headers(), state.cookie_name()) {
		Some(token) => match state.verifier.authenticate(&token).await {
			Ok(principal) => {
				span.record("auth_method", tracing::field::display(principal.method));
				span.record("uid", tracing::field::display(&principal.uid));
				AuthContext::authenticated(principal)
			}
			Err(e) if e.is_internal() => {
				tracing::error!(error = %e, "token verification failed");
				span.record("auth_method", "error");
				return ServerError::from(e).into_response();
			}
			Err(e) => {
				tracing::debug!(error = %e, "token rejected");
				span.record("auth_method", "rejected");
				AuthContext::unauthenticated()
			}
		},
		None => {
			span.record("auth_method", "none");
			AuthContext::unauthenticated()
		}
	};

	request.extensions_mut().insert(auth_ctx);
	next.run(request).await
}

/// Extractor for the authenticated principal. Rejects with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<AuthContext>()
			.and_then(|ctx| ctx.principal.clone())
			.map(RequireAuth)
			.ok_or_else(|| ServerError::Unauthorized("Authentication required".to_string()))
	}
}
