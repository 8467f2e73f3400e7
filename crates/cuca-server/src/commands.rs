// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator commands that act on the store directly, without HTTP.

use chrono::{DateTime, Utc};
use cuca_reservations_core::{NewReservation, Pets, Reservation};
use cuca_server_identity::{IdentityError, UserRecord};

use crate::{api::AppState, error::ServerError};

/// Input for [`create_reservation`].
#[derive(Debug, Clone)]
pub struct CreateReservationArgs {
	pub email: String,
	pub name: String,
	pub phone: String,
	pub dates: Vec<DateTime<Utc>>,
	pub hosts: u32,
	pub pets: bool,
}

/// Write a reservation straight to the store.
///
/// When `email` belongs to a registered account the reservation is stamped
/// with that account's uid, so it shows up under "my reservations".
#[tracing::instrument(skip_all, fields(email = %args.email))]
pub async fn create_reservation(
	state: &AppState,
	args: CreateReservationArgs,
) -> Result<Reservation, ServerError> {
	let user_id = match state.identity.get_user_by_email(&args.email).await {
		Ok(user) => Some(user.uid),
		Err(IdentityError::UserNotFound) => {
			tracing::info!("no account for email; reservation will be owned by email only");
			None
		}
		Err(e) => return Err(e.into()),
	};

	let new = NewReservation {
		dates: args.dates,
		email: Some(args.email),
		user_id,
		hosts: Some(args.hosts),
		name: Some(args.name),
		phone: Some(args.phone),
		pets: Some(if args.pets { Pets::Yes } else { Pets::No }),
		..Default::default()
	};

	Ok(state.reservations.create(new).await?)
}

/// Grant or revoke the admin flag on the account registered under `email`.
#[tracing::instrument(skip(state))]
pub async fn set_admin(state: &AppState, email: &str, admin: bool) -> Result<UserRecord, ServerError> {
	let user = state.identity.get_user_by_email(email).await?;
	let updated = state.identity.set_admin(&user.uid, admin).await?;
	tracing::info!(uid = %updated.uid, admin, "admin flag updated");
	Ok(updated)
}
