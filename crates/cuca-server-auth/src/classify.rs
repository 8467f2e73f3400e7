// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token classification.
//!
//! Classification only reads the unsigned payload to pick a trust path. It
//! grants nothing by itself; the chosen path still verifies the token.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};
use std::fmt;

/// The format a bearer token claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// Payload carries `uid` and `email`: a session token signed by this server.
	Local,
	/// Payload carries `uid` only: issued by the identity provider.
	External,
	/// Decodes to a JSON object matching neither shape.
	Unknown,
	/// Not a decodable token.
	Invalid,
}

impl TokenKind {
	/// Name used in logs and status responses.
	pub fn as_str(&self) -> &'static str {
		match self {
			TokenKind::Local => "jwt",
			TokenKind::External => "firebase",
			TokenKind::Unknown => "unknown",
			TokenKind::Invalid => "invalid",
		}
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Decode the payload segment of a dot-separated token without verifying it.
///
/// Accepts both the URL-safe and standard base64 alphabets, with or without
/// padding. Returns `None` unless the payload is a JSON object.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
	let mut segments = token.split('.');
	let _header = segments.next()?;
	let payload = segments.next()?;

	let normalized: String = payload
		.trim_end_matches('=')
		.chars()
		.map(|c| match c {
			'+' => '-',
			'/' => '_',
			other => other,
		})
		.collect();

	let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes()).ok()?;
	match serde_json::from_slice::<Value>(&bytes).ok()? {
		Value::Object(map) => Some(map),
		_ => None,
	}
}

fn has_string(claims: &Map<String, Value>, key: &str) -> bool {
	matches!(claims.get(key), Some(Value::String(_)))
}

/// Pick the trust path for `token`.
///
/// Rules, first match wins:
/// 1. `uid` and `email` → [`TokenKind::Local`]
/// 2. `uid` → [`TokenKind::External`]
/// 3. anything else → [`TokenKind::Unknown`]
pub fn classify_token(token: &str) -> TokenKind {
	let Some(claims) = decode_claims(token) else {
		return TokenKind::Invalid;
	};

	if has_string(&claims, "uid") && has_string(&claims, "email") {
		TokenKind::Local
	} else if has_string(&claims, "uid") {
		TokenKind::External
	} else {
		TokenKind::Unknown
	}
}
