// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reservation repository on top of a [`DocumentStore`].

use chrono::Utc;
use cuca_reservations_core::{NewReservation, Reservation, ReservationPatch};
use serde_json::Value;
use std::sync::Arc;

use crate::document::{Document, DocumentStore};
use crate::error::DbError;

/// Reads and writes reservations in one collection.
#[derive(Clone)]
pub struct ReservationRepository {
	store: Arc<dyn DocumentStore>,
	collection: String,
}

impl ReservationRepository {
	pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
		Self {
			store,
			collection: collection.into(),
		}
	}

	pub fn collection(&self) -> &str {
		&self.collection
	}

	fn decode(&self, doc: Document) -> Option<Reservation> {
		match Reservation::from_document(&doc.id, doc.body) {
			Ok(r) => Some(r),
			Err(e) => {
				tracing::warn!(collection = %self.collection, id = %doc.id, error = %e, "skipping unreadable reservation");
				None
			}
		}
	}

	fn decode_all(&self, docs: Vec<Document>) -> Vec<Reservation> {
		docs.into_iter().filter_map(|d| self.decode(d)).collect()
	}

	/// Store a new reservation.
	///
	/// With a caller-supplied `id` the record is written at exactly that key
	/// (replacing anything there); otherwise the store assigns one.
	#[tracing::instrument(skip(self, new), fields(collection = %self.collection))]
	pub async fn create(&self, new: NewReservation) -> Result<Reservation, DbError> {
		let now = Utc::now();
		match new.id.clone() {
			Some(id) => {
				let reservation = new.build(id.trim().to_string(), now)?;
				self.store
					.set(&self.collection, &reservation.id, reservation.to_document())
					.await?;
				tracing::info!(id = %reservation.id, "reservation created at requested id");
				Ok(reservation)
			}
			None => {
				let mut reservation = new.build(String::new(), now)?;
				let id = self
					.store
					.add(&self.collection, reservation.to_document())
					.await?;
				reservation.id = id;
				tracing::info!(id = %reservation.id, "reservation created");
				Ok(reservation)
			}
		}
	}

	#[tracing::instrument(skip(self), fields(collection = %self.collection))]
	pub async fn get(&self, id: &str) -> Result<Option<Reservation>, DbError> {
		match self.store.get(&self.collection, id).await? {
			Some(doc) => Ok(Some(Reservation::from_document(&doc.id, doc.body)?)),
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self), fields(collection = %self.collection))]
	pub async fn list_all(&self) -> Result<Vec<Reservation>, DbError> {
		let docs = self.store.list(&self.collection).await?;
		Ok(self.decode_all(docs))
	}

	#[tracing::instrument(skip(self), fields(collection = %self.collection))]
	pub async fn list_by_user_id(&self, uid: &str) -> Result<Vec<Reservation>, DbError> {
		let docs = self
			.store
			.query(&self.collection, "userId", &Value::String(uid.to_string()))
			.await?;
		Ok(self.decode_all(docs))
	}

	#[tracing::instrument(skip(self, email), fields(collection = %self.collection))]
	pub async fn list_by_email(&self, email: &str) -> Result<Vec<Reservation>, DbError> {
		let docs = self
			.store
			.query(&self.collection, "email", &Value::String(email.to_string()))
			.await?;
		Ok(self.decode_all(docs))
	}

	/// Apply `patch` to the stored record and write the result back.
	///
	/// One read, one write, no version check: two concurrent updates both
	/// succeed and the later write determines the stored state.
	#[tracing::instrument(skip(self, patch), fields(collection = %self.collection))]
	pub async fn update(&self, id: &str, patch: &ReservationPatch) -> Result<Reservation, DbError> {
		let Some(mut reservation) = self.get(id).await? else {
			return Err(DbError::NotFound(format!("reservation {id}")));
		};
		let previous_status = reservation.status;

		patch.apply(&mut reservation, Utc::now())?;
		self.store
			.update(&self.collection, id, reservation.to_document())
			.await?;

		if reservation.status != previous_status {
			tracing::info!(id, from = %previous_status, to = %reservation.status, "reservation status changed");
		}
		Ok(reservation)
	}

	#[tracing::instrument(skip(self), fields(collection = %self.collection))]
	pub async fn delete(&self, id: &str) -> Result<(), DbError> {
		self.store.delete(&self.collection, id).await?;
		tracing::info!(id, "reservation deleted");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::document::SqliteDocumentStore;
	use crate::pool::{create_pool, run_migrations};
	use chrono::{DateTime, TimeZone};
	use cuca_reservations_core::{ReservationStatus, ValidationError};
	use tempfile::TempDir;

	async fn repo() -> (ReservationRepository, TempDir) {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("res.db").display());
		let pool = create_pool(&url).await.unwrap();
		run_migrations(&pool).await.unwrap();
		let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool));
		(ReservationRepository::new(store, "test-cuca"), dir)
	}

	fn day(d: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 9, d, 0, 0, 0).unwrap()
	}

	fn new_reservation(email: &str) -> NewReservation {
		NewReservation {
			dates: vec![day(1), day(2)],
			email: Some(email.to_string()),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn create_without_id_gets_store_id() {
		let (repo, _dir) = repo().await;
		let created = repo.create(new_reservation("a@x.com")).await.unwrap();
		assert!(!created.id.is_empty());
		let fetched = repo.get(&created.id).await.unwrap().unwrap();
		assert_eq!(fetched, created);
	}

	#[tokio::test]
	async fn create_with_id_uses_exact_key() {
		let (repo, _dir) = repo().await;
		let created = repo
			.create(NewReservation {
				id: Some("booking-42".to_string()),
				..new_reservation("a@x.com")
			})
			.await
			.unwrap();
		assert_eq!(created.id, "booking-42");
		assert!(repo.get("booking-42").await.unwrap().is_some());
	}

	#[tokio::test]
	async fn create_rejects_invalid_payload() {
		let (repo, _dir) = repo().await;
		let err = repo
			.create(NewReservation {
				dates: vec![],
				..new_reservation("a@x.com")
			})
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(ValidationError::EmptyDates)));
		assert!(repo.list_all().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn listing_by_owner_fields() {
		let (repo, _dir) = repo().await;
		repo.create(NewReservation {
			user_id: Some("u1".to_string()),
			..new_reservation("a@x.com")
		})
		.await
		.unwrap();
		repo.create(new_reservation("a@x.com")).await.unwrap();
		repo.create(new_reservation("b@x.com")).await.unwrap();

		assert_eq!(repo.list_all().await.unwrap().len(), 3);
		assert_eq!(repo.list_by_user_id("u1").await.unwrap().len(), 1);
		assert_eq!(repo.list_by_email("a@x.com").await.unwrap().len(), 2);
		assert!(repo.list_by_user_id("nobody").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn update_recomputes_and_stamps() {
		let (repo, _dir) = repo().await;
		let created = repo.create(new_reservation("a@x.com")).await.unwrap();

		let updated = repo
			.update(
				&created.id,
				&ReservationPatch {
					dates: Some(vec![day(3), day(4), day(5)]),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(updated.total_nights, 3);
		assert!(updated.status_updated_at.is_none());

		let updated = repo
			.update(
				&created.id,
				&ReservationPatch {
					status: Some(ReservationStatus::Confirmed),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert!(updated.status_updated_at.is_some());

		let stored = repo.get(&created.id).await.unwrap().unwrap();
		assert_eq!(stored.total_nights, 3);
		assert_eq!(stored.status, ReservationStatus::Confirmed);
		assert_eq!(stored.created_at, created.created_at);
	}

	#[tokio::test]
	async fn update_missing_is_not_found() {
		let (repo, _dir) = repo().await;
		assert!(matches!(
			repo.update("missing", &ReservationPatch::default()).await,
			Err(DbError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn delete_removes_record() {
		let (repo, _dir) = repo().await;
		let created = repo.create(new_reservation("a@x.com")).await.unwrap();
		repo.delete(&created.id).await.unwrap();
		assert!(repo.get(&created.id).await.unwrap().is_none());
	}

	/// Updates carry no version check. Both writers succeed and the stored
	/// record matches whichever wrote last.
	#[tokio::test]
	async fn concurrent_updates_last_write_wins() {
		let (repo, _dir) = repo().await;
		let created = repo.create(new_reservation("a@x.com")).await.unwrap();

		let first = ReservationPatch {
			name: Some("first".to_string()),
			hosts: Some(2),
			..Default::default()
		};
		let second = ReservationPatch {
			name: Some("second".to_string()),
			hosts: Some(3),
			..Default::default()
		};

		let (a, b) = tokio::join!(
			repo.update(&created.id, &first),
			repo.update(&created.id, &second)
		);
		let a = a.unwrap();
		let b = b.unwrap();

		let stored = repo.get(&created.id).await.unwrap().unwrap();
		assert!(
			stored == a || stored == b,
			"stored record must equal one writer's full result, got {stored:?}"
		);
		assert_eq!(stored.hosts, if stored.name == "first" { 2 } else { 3 });
	}

	#[tokio::test]
	async fn stale_writer_overwrites_newer_state() {
		let (repo, _dir) = repo().await;
		let created = repo.create(new_reservation("a@x.com")).await.unwrap();

		repo.update(
			&created.id,
			&ReservationPatch {
				name: Some("newer".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap();

		// A writer holding the original snapshot writes its whole document back.
		let mut stale = created.clone();
		stale.phone = "555-0100".to_string();
		repo.store
			.update(repo.collection(), &created.id, stale.to_document())
			.await
			.unwrap();

		let stored = repo.get(&created.id).await.unwrap().unwrap();
		assert_eq!(stored.name, "");
		assert_eq!(stored.phone, "555-0100");
	}
}
