// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reservation records and the create payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ValidationError};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
	#[default]
	Pending,
	Confirmed,
	Cancelled,
}

impl fmt::Display for ReservationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			ReservationStatus::Pending => "pending",
			ReservationStatus::Confirmed => "confirmed",
			ReservationStatus::Cancelled => "cancelled",
		};
		f.write_str(s)
	}
}

/// Whether the guests bring pets. Serialized the way the booking form submits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Pets {
	#[serde(rename = "Sí")]
	Yes,
	#[default]
	#[serde(rename = "No")]
	No,
}

fn default_hosts() -> u32 {
	1
}

/// A stored reservation.
///
/// Documents written by older clients may lack most fields, so everything
/// except `dates` and `email` falls back to its default on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
	/// Document key. Not part of the stored body.
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub dates: Vec<DateTime<Utc>>,
	#[serde(default)]
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	#[serde(default = "default_hosts")]
	pub hosts: u32,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub pets: Pets,
	#[serde(default)]
	pub status: ReservationStatus,
	#[serde(default)]
	pub total_nights: u32,
	#[serde(default = "Utc::now")]
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status_updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
	/// The identity that owns this record: `userId` when set, else `email`.
	pub fn owner(&self) -> &str {
		self.user_id.as_deref().unwrap_or(&self.email)
	}

	/// Whether `email` or `uid` matches the ownership fields.
	pub fn is_owned_by(&self, uid: &str, email: Option<&str>) -> bool {
		let email_match = email.is_some_and(|e| !e.is_empty() && e == self.email);
		let uid_match = self.user_id.as_deref() == Some(uid);
		email_match || uid_match
	}

	pub fn validate(&self) -> Result<()> {
		if self.dates.is_empty() {
			return Err(ValidationError::EmptyDates);
		}
		if self.hosts < 1 {
			return Err(ValidationError::InvalidHosts);
		}
		if self.total_nights as usize != self.dates.len() {
			return Err(ValidationError::InvalidTotalNights);
		}
		validate_email(&self.email)
	}

	/// Stored body: the record without its key.
	pub fn to_document(&self) -> serde_json::Value {
		let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
		if let Some(map) = value.as_object_mut() {
			map.remove("id");
		}
		value
	}

	/// Rebuild a record from its key and stored body.
	pub fn from_document(
		id: &str,
		body: serde_json::Value,
	) -> std::result::Result<Self, serde_json::Error> {
		let mut reservation: Reservation = serde_json::from_value(body)?;
		reservation.id = id.to_string();
		Ok(reservation)
	}
}

/// One night per entry in `dates`.
pub fn nights_for(dates: &[DateTime<Utc>]) -> u32 {
	u32::try_from(dates.len()).unwrap_or(u32::MAX)
}

/// Check that an address has a non-empty local part and domain.
pub fn validate_email(email: &str) -> Result<()> {
	let email = email.trim();
	if email.is_empty() {
		return Err(ValidationError::MissingEmail);
	}
	match email.split_once('@') {
		Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
			Ok(())
		}
		_ => Err(ValidationError::InvalidEmail(email.to_string())),
	}
}

/// Payload for creating a reservation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
	/// Caller-chosen key. When absent the store assigns one.
	#[serde(default)]
	pub id: Option<String>,
	pub dates: Vec<DateTime<Utc>>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default)]
	pub hosts: Option<u32>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub pets: Option<Pets>,
	#[serde(default)]
	pub status: Option<ReservationStatus>,
	#[serde(default)]
	pub total_nights: Option<u32>,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
}

impl NewReservation {
	/// Fill defaults and validate. `id` is the key the record will be stored under.
	///
	/// `totalNights` is always derived from `dates`; a supplied value is ignored.
	pub fn build(self, id: String, now: DateTime<Utc>) -> Result<Reservation> {
		if let Some(requested) = &self.id {
			if requested.trim().is_empty() {
				return Err(ValidationError::EmptyId);
			}
		}

		let reservation = Reservation {
			id,
			email: self.email.map(|e| e.trim().to_string()).unwrap_or_default(),
			user_id: self.user_id.filter(|u| !u.is_empty()),
			hosts: self.hosts.unwrap_or(1),
			name: self.name.unwrap_or_default(),
			phone: self.phone.unwrap_or_default(),
			pets: self.pets.unwrap_or_default(),
			status: self.status.unwrap_or_default(),
			total_nights: nights_for(&self.dates),
			created_at: self.created_at.unwrap_or(now),
			status_updated_at: None,
			dates: self.dates,
		};
		reservation.validate()?;
		Ok(reservation)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn day(d: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 7, d, 0, 0, 0).unwrap()
	}

	fn payload() -> NewReservation {
		NewReservation {
			dates: vec![day(1), day(2), day(3)],
			email: Some("guest@example.com".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn build_applies_defaults() {
		let now = day(10);
		let r = payload().build("r1".to_string(), now).unwrap();
		assert_eq!(r.id, "r1");
		assert_eq!(r.hosts, 1);
		assert_eq!(r.name, "");
		assert_eq!(r.phone, "");
		assert_eq!(r.pets, Pets::No);
		assert_eq!(r.status, ReservationStatus::Pending);
		assert_eq!(r.total_nights, 3);
		assert_eq!(r.created_at, now);
		assert!(r.status_updated_at.is_none());
	}

	#[test]
	fn build_derives_total_nights_from_dates() {
		let r = NewReservation {
			total_nights: Some(9),
			..payload()
		}
		.build("r1".to_string(), day(10))
		.unwrap();
		assert_eq!(r.total_nights, 3);
	}

	#[test]
	fn validate_rejects_mismatched_total_nights() {
		let mut r = payload().build("r1".to_string(), day(10)).unwrap();
		r.total_nights = 30;
		assert_eq!(r.validate(), Err(ValidationError::InvalidTotalNights));
	}

	#[test]
	fn build_rejects_empty_dates() {
		let err = NewReservation {
			dates: vec![],
			..payload()
		}
		.build("r1".to_string(), day(10))
		.unwrap_err();
		assert_eq!(err, ValidationError::EmptyDates);
	}

	#[test]
	fn build_rejects_zero_hosts() {
		let err = NewReservation {
			hosts: Some(0),
			..payload()
		}
		.build("r1".to_string(), day(10))
		.unwrap_err();
		assert_eq!(err, ValidationError::InvalidHosts);
	}

	#[test]
	fn build_requires_email() {
		let err = NewReservation {
			email: None,
			..payload()
		}
		.build("r1".to_string(), day(10))
		.unwrap_err();
		assert_eq!(err, ValidationError::MissingEmail);
	}

	#[test]
	fn build_rejects_blank_requested_id() {
		let err = NewReservation {
			id: Some("  ".to_string()),
			..payload()
		}
		.build("x".to_string(), day(10))
		.unwrap_err();
		assert_eq!(err, ValidationError::EmptyId);
	}

	#[test]
	fn email_validation() {
		assert!(validate_email("a@b").is_ok());
		assert!(matches!(
			validate_email("nobody"),
			Err(ValidationError::InvalidEmail(_))
		));
		assert!(matches!(
			validate_email("@example.com"),
			Err(ValidationError::InvalidEmail(_))
		));
		assert_eq!(validate_email(" "), Err(ValidationError::MissingEmail));
	}

	#[test]
	fn wire_format_is_camel_case() {
		let r = NewReservation {
			user_id: Some("u1".to_string()),
			pets: Some(Pets::Yes),
			..payload()
		}
		.build("r1".to_string(), day(10))
		.unwrap();
		let json = serde_json::to_value(&r).unwrap();
		assert_eq!(json["userId"], "u1");
		assert_eq!(json["totalNights"], 3);
		assert_eq!(json["pets"], "Sí");
		assert_eq!(json["status"], "pending");
		assert!(json.get("statusUpdatedAt").is_none());
	}

	#[test]
	fn document_excludes_id_and_restores_it() {
		let r = payload().build("r1".to_string(), day(10)).unwrap();
		let doc = r.to_document();
		assert!(doc.get("id").is_none());
		let back = Reservation::from_document("r1", doc).unwrap();
		assert_eq!(back, r);
	}

	#[test]
	fn sparse_document_reads_with_defaults() {
		let body = serde_json::json!({
			"dates": ["2025-07-01T00:00:00Z"],
			"email": "guest@example.com"
		});
		let r = Reservation::from_document("legacy", body).unwrap();
		assert_eq!(r.hosts, 1);
		assert_eq!(r.pets, Pets::No);
		assert_eq!(r.owner(), "guest@example.com");
	}

	#[test]
	fn ownership_matches_email_or_uid() {
		let mut r = payload().build("r1".to_string(), day(10)).unwrap();
		assert!(r.is_owned_by("someone", Some("guest@example.com")));
		assert!(!r.is_owned_by("u1", Some("other@example.com")));
		r.user_id = Some("u1".to_string());
		assert!(r.is_owned_by("u1", None));
		assert_eq!(r.owner(), "u1");
		assert!(!r.is_owned_by("u2", Some("")));
	}
}
