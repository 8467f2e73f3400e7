// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Cuca reservations.
//!
//! A [`Reservation`] is stored as a camelCase JSON document keyed by its id.
//! New records are built from a [`NewReservation`] payload and changed through
//! a [`ReservationPatch`], which only accepts the fields an owner may edit.

pub mod error;
pub mod patch;
pub mod reservation;

pub use error::{Result, ValidationError};
pub use patch::ReservationPatch;
pub use reservation::{
	nights_for, validate_email, NewReservation, Pets, Reservation, ReservationStatus,
};
