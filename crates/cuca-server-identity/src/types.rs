// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	pub uid: String,
	pub email: String,
	pub email_verified: bool,
	pub display_name: Option<String>,
	#[serde(rename = "photoURL")]
	pub photo_url: Option<String>,
	pub disabled: bool,
	pub admin: bool,
	pub created_at: DateTime<Utc>,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default, rename = "photoURL")]
	pub photo_url: Option<String>,
}

impl UserUpdate {
	pub fn is_empty(&self) -> bool {
		self.display_name.is_none() && self.photo_url.is_none()
	}
}
