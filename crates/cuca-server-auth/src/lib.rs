// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and reservation access control for Cuca.
//!
//! This crate provides:
//! - Bearer token classification ([`classify_token`])
//! - Locally-signed session tokens ([`SessionTokens`])
//! - The dual-mode verifier that gates protected routes ([`TokenVerifier`])
//! - The ownership rules for mutating reservations ([`can_mutate`])
//! - Header helpers for finding the token on a request
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Authorization: Bearer / session cookie → classify_token
//!                                                       │
//!                                                       ├── jwt      → HS256 check with server secret
//!                                                       ├── firebase → identity provider resolves uid
//!                                                       └── other    → 401
//! ```
//!
//! Token values are never logged.

pub mod access;
pub mod classify;
pub mod error;
pub mod middleware;
pub mod principal;
pub mod session_token;
pub mod verifier;

pub use access::{authorize_mutation, can_mutate};
pub use classify::{classify_token, decode_claims, TokenKind};
pub use error::AuthError;
pub use middleware::{
	extract_bearer_token, extract_session_cookie_with_name, extract_token, AuthContext,
	AuthRequired,
};
pub use principal::{AuthMethod, Principal};
pub use session_token::{SessionClaims, SessionTokens, SESSION_TOKEN_TTL_HOURS};
pub use verifier::{AuthStatus, ExternalVerifier, StatusUser, TokenVerifier};
