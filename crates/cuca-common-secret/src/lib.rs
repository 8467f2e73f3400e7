// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for credentials that flow through the booking server.
//!
//! Session signing keys, user passwords and bearer tokens all pass through
//! request handlers that log liberally. Wrapping them in [`Secret`] keeps them
//! out of `Debug`/`Display` output (and therefore out of `tracing` fields) and
//! zeroes the memory on drop.
//!
//! ```
//! use cuca_common_secret::SecretString;
//!
//! let password = SecretString::new("hunter22".to_string());
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), "hunter22");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder printed instead of the wrapped value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed.
///
/// There is no `Deref`; callers go through [`Secret::expose`] so every read of
/// the raw value is visible at the call site.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the raw value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// Raw bytes, for feeding HMAC keys.
	pub fn as_bytes(&self) -> &[u8] {
		self.inner.as_bytes()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Secret::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_hide_the_value() {
		let key = SecretString::from("session-signing-key");
		assert_eq!(format!("{key}"), REDACTED);
		let debug = format!("{key:?}");
		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("session-signing-key"));
	}

	#[test]
	fn expose_returns_raw_value() {
		let key = SecretString::from("abc");
		assert_eq!(key.expose(), "abc");
		assert_eq!(key.as_bytes(), b"abc");
		assert!(!key.is_empty());
	}

	#[test]
	fn option_of_secret_stays_redacted() {
		let maybe: Option<SecretString> = Some(SecretString::from("pw123456"));
		assert!(!format!("{maybe:?}").contains("pw123456"));
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serializes_redacted_and_deserializes_raw() {
		let key = SecretString::from("token-value");
		let json = serde_json::to_string(&key).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let parsed: SecretString = serde_json::from_str("\"token-value\"").unwrap();
		assert_eq!(parsed, key);
	}

	proptest! {
		#[test]
		fn display_never_leaks(inner in "[a-z0-9]{4,40}") {
			prop_assume!(!REDACTED.to_lowercase().contains(&inner));
			let secret = SecretString::new(inner.clone());
			let displayed = format!("{secret}");
			let debugged = format!("{secret:?}");
			prop_assert!(!displayed.contains(&inner));
			prop_assert!(!debugged.contains(&inner));
		}
	}
}
