// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Cuca booking server.
//!
//! Reservations live as JSON documents in named collections. The
//! [`DocumentStore`] trait is the seam; [`SqliteDocumentStore`] keeps the
//! documents in a single SQLite table.

pub mod document;
pub mod error;
pub mod pool;
pub mod reservation;

pub use document::{Document, DocumentStore, SqliteDocumentStore};
pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use reservation::ReservationRepository;
