// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial updates to a reservation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::reservation::{nights_for, validate_email, Pets, Reservation, ReservationStatus};

/// Fields an update request may change. Anything else in the body is rejected.
///
/// `id`, `userId`, `createdAt` and `statusUpdatedAt` are owned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReservationPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dates: Option<Vec<DateTime<Utc>>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hosts: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pets: Option<Pets>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<ReservationStatus>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_nights: Option<u32>,
}

impl ReservationPatch {
	pub fn is_empty(&self) -> bool {
		*self == ReservationPatch::default()
	}

	/// Merge onto `reservation`.
	///
	/// `totalNights` always follows the resulting `dates`; a supplied value
	/// is accepted for compatibility and ignored.
	/// `statusUpdatedAt` is stamped only when the status actually changes.
	/// On error `reservation` is left untouched.
	pub fn apply(&self, reservation: &mut Reservation, now: DateTime<Utc>) -> Result<()> {
		let mut next = reservation.clone();

		if let Some(email) = &self.email {
			validate_email(email)?;
			next.email = email.trim().to_string();
		}
		if let Some(hosts) = self.hosts {
			next.hosts = hosts;
		}
		if let Some(name) = &self.name {
			next.name = name.clone();
		}
		if let Some(phone) = &self.phone {
			next.phone = phone.clone();
		}
		if let Some(pets) = self.pets {
			next.pets = pets;
		}
		if let Some(dates) = &self.dates {
			if dates.is_empty() {
				return Err(ValidationError::EmptyDates);
			}
			next.dates = dates.clone();
		}
		next.total_nights = nights_for(&next.dates);
		if let Some(status) = self.status {
			if status != next.status {
				next.status = status;
				next.status_updated_at = Some(now);
			}
		}

		next.validate()?;
		*reservation = next;
		Ok(())
	}
}
