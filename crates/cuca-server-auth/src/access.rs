// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Who may change a reservation.
//!
//! Admins may change anything. Everyone else may change a reservation when
//! its `email` matches theirs or its `userId` matches their uid. A missing
//! reservation is reported exactly like a denial so callers cannot probe ids.

use cuca_reservations_core::Reservation;
use tracing::debug;

use crate::error::AuthError;
use crate::principal::Principal;

/// Whether `principal` may update or delete `reservation`.
pub fn can_mutate(principal: &Principal, reservation: &Reservation) -> bool {
	principal.admin || reservation.is_owned_by(&principal.uid, principal.email())
}

/// Gate for the update and delete paths.
///
/// `reservation` is `None` when the lookup found nothing. Admins pass anyway
/// and the store call decides what happens next.
pub fn authorize_mutation(
	principal: &Principal,
	reservation: Option<&Reservation>,
) -> Result<(), AuthError> {
	if principal.admin {
		return Ok(());
	}
	match reservation {
		Some(r) if can_mutate(principal, r) => Ok(()),
		Some(r) => {
			debug!(uid = %principal.uid, reservation_id = %r.id, "reservation not owned by caller");
			Err(AuthError::AccessDenied)
		}
		None => {
			debug!(uid = %principal.uid, "reservation not found, denying");
			Err(AuthError::AccessDenied)
		}
	}
}
