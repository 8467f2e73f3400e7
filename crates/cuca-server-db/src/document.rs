// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON document store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;

/// A stored document and its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	pub id: String,
	pub body: Value,
}

/// Collections of JSON objects keyed by id.
///
/// Writes are single statements with no version check; concurrent writers to
/// the same document race and the last one wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError>;

	/// Documents whose top-level `field` equals `value` (string, number or bool).
	async fn query(
		&self,
		collection: &str,
		field: &str,
		value: &Value,
	) -> Result<Vec<Document>, DbError>;

	async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError>;

	/// Insert under a store-assigned id, returned to the caller.
	async fn add(&self, collection: &str, body: Value) -> Result<String, DbError>;

	/// Insert or replace the document at `id`.
	async fn set(&self, collection: &str, id: &str, body: Value) -> Result<(), DbError>;

	/// Merge `partial`'s top-level keys into an existing document.
	/// Fails with [`DbError::NotFound`] when there is nothing to merge into.
	async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), DbError>;

	/// Remove the document. Deleting a missing document is not an error.
	async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError>;

	/// Cheap round trip used by the health check.
	async fn ping(&self) -> Result<(), DbError>;
}

/// Document store backed by the `documents` table.
#[derive(Clone)]
pub struct SqliteDocumentStore {
	pool: SqlitePool,
}

impl SqliteDocumentStore {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

fn require_object(body: &Value) -> Result<String, DbError> {
	if !body.is_object() {
		return Err(DbError::InvalidQuery("document body must be a JSON object".into()));
	}
	Ok(serde_json::to_string(body)?)
}

fn json_path(field: &str) -> Result<String, DbError> {
	let valid = !field.is_empty()
		&& field
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_');
	if !valid {
		return Err(DbError::InvalidQuery(format!("unsupported field name: {field}")));
	}
	Ok(format!("$.{field}"))
}

fn rows_to_documents(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<Document>, DbError> {
	rows.into_iter()
		.map(|row| {
			let body: String = row.try_get("body")?;
			Ok(Document {
				id: row.try_get("id")?,
				body: serde_json::from_str(&body)?,
			})
		})
		.collect()
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
	#[tracing::instrument(skip(self))]
	async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
		let row = sqlx::query("SELECT id, body FROM documents WHERE collection = ? AND id = ?")
			.bind(collection)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => Ok(rows_to_documents(vec![row])?.pop()),
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self, value))]
	async fn query(
		&self,
		collection: &str,
		field: &str,
		value: &Value,
	) -> Result<Vec<Document>, DbError> {
		let path = json_path(field)?;
		let query = sqlx::query(
			r#"
			SELECT id, body FROM documents
			WHERE collection = ? AND json_extract(body, ?) = ?
			ORDER BY created_at, id
			"#,
		)
		.bind(collection)
		.bind(path);

		let query = match value {
			Value::String(s) => query.bind(s.clone()),
			Value::Bool(b) => query.bind(i64::from(*b)),
			Value::Number(n) => match n.as_i64() {
				Some(i) => query.bind(i),
				None => query.bind(n.as_f64().unwrap_or_default()),
			},
			_ => {
				return Err(DbError::InvalidQuery(
					"only scalar values can be matched".into(),
				))
			}
		};

		let rows = query.fetch_all(&self.pool).await?;
		rows_to_documents(rows)
	}

	#[tracing::instrument(skip(self))]
	async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError> {
		let rows = sqlx::query(
			"SELECT id, body FROM documents WHERE collection = ? ORDER BY created_at, id",
		)
		.bind(collection)
		.fetch_all(&self.pool)
		.await?;
		rows_to_documents(rows)
	}

	#[tracing::instrument(skip(self, body))]
	async fn add(&self, collection: &str, body: Value) -> Result<String, DbError> {
		let id = Uuid::new_v4().simple().to_string();
		let body = require_object(&body)?;
		let now = Utc::now().to_rfc3339();

		sqlx::query(
			r#"
			INSERT INTO documents (collection, id, body, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(collection)
		.bind(&id)
		.bind(&body)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		tracing::debug!(collection, id = %id, "document added");
		Ok(id)
	}

	#[tracing::instrument(skip(self, body))]
	async fn set(&self, collection: &str, id: &str, body: Value) -> Result<(), DbError> {
		if id.is_empty() {
			return Err(DbError::InvalidQuery("document id must not be empty".into()));
		}
		let body = require_object(&body)?;
		let now = Utc::now().to_rfc3339();

		sqlx::query(
			r#"
			INSERT INTO documents (collection, id, body, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			ON CONFLICT (collection, id) DO UPDATE SET
				body = excluded.body,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(collection)
		.bind(id)
		.bind(&body)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		tracing::debug!(collection, id, "document set");
		Ok(())
	}

	#[tracing::instrument(skip(self, partial))]
	async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), DbError> {
		let partial = require_object(&partial)?;

		// json_patch merges top-level keys in one statement; nested objects would
		// be merged recursively, which reservation documents never contain.
		let result = sqlx::query(
			r#"
			UPDATE documents
			SET body = json_patch(body, ?), updated_at = ?
			WHERE collection = ? AND id = ?
			"#,
		)
		.bind(&partial)
		.bind(Utc::now().to_rfc3339())
		.bind(collection)
		.bind(id)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("{collection}/{id}")));
		}
		tracing::debug!(collection, id, "document updated");
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
		let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
			.bind(collection)
			.bind(id)
			.execute(&self.pool)
			.await?;
		tracing::debug!(collection, id, deleted = result.rows_affected(), "document delete");
		Ok(())
	}

	async fn ping(&self) -> Result<(), DbError> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pool::{create_pool, run_migrations};
	use serde_json::json;
	use tempfile::TempDir;

	async fn store() -> (SqliteDocumentStore, TempDir) {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("docs.db").display());
		let pool = create_pool(&url).await.unwrap();
		run_migrations(&pool).await.unwrap();
		(SqliteDocumentStore::new(pool), dir)
	}

	#[tokio::test]
	async fn add_assigns_id() {
		let (store, _dir) = store().await;
		let id = store.add("c", json!({ "a": 1 })).await.unwrap();
		assert!(!id.is_empty());
		let doc = store.get("c", &id).await.unwrap().unwrap();
		assert_eq!(doc.body, json!({ "a": 1 }));
	}

	#[tokio::test]
	async fn set_uses_exact_key_and_replaces() {
		let (store, _dir) = store().await;
		store.set("c", "k1", json!({ "a": 1, "b": 2 })).await.unwrap();
		store.set("c", "k1", json!({ "a": 3 })).await.unwrap();
		let doc = store.get("c", "k1").await.unwrap().unwrap();
		assert_eq!(doc.body, json!({ "a": 3 }));
	}

	#[tokio::test]
	async fn collections_are_isolated() {
		let (store, _dir) = store().await;
		store.set("one", "k", json!({ "x": 1 })).await.unwrap();
		assert!(store.get("two", "k").await.unwrap().is_none());
		assert!(store.list("two").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn update_merges_top_level_keys() {
		let (store, _dir) = store().await;
		store
			.set("c", "k", json!({ "a": 1, "b": "keep", "list": [1, 2] }))
			.await
			.unwrap();
		store
			.update("c", "k", json!({ "a": 2, "list": [3] }))
			.await
			.unwrap();
		let doc = store.get("c", "k").await.unwrap().unwrap();
		assert_eq!(doc.body, json!({ "a": 2, "b": "keep", "list": [3] }));
	}

	#[tokio::test]
	async fn update_missing_is_not_found() {
		let (store, _dir) = store().await;
		assert!(matches!(
			store.update("c", "missing", json!({ "a": 1 })).await,
			Err(DbError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn query_matches_scalar_fields() {
		let (store, _dir) = store().await;
		store.set("c", "1", json!({ "email": "a@x", "n": 1, "ok": true })).await.unwrap();
		store.set("c", "2", json!({ "email": "b@x", "n": 2, "ok": false })).await.unwrap();

		let by_email = store.query("c", "email", &json!("a@x")).await.unwrap();
		assert_eq!(by_email.len(), 1);
		assert_eq!(by_email[0].id, "1");

		assert_eq!(store.query("c", "n", &json!(2)).await.unwrap()[0].id, "2");
		assert_eq!(store.query("c", "ok", &json!(true)).await.unwrap()[0].id, "1");
		assert!(store.query("c", "email", &json!("z@x")).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn query_rejects_bad_field_names() {
		let (store, _dir) = store().await;
		assert!(matches!(
			store.query("c", "a') OR 1=1 --", &json!("x")).await,
			Err(DbError::InvalidQuery(_))
		));
		assert!(matches!(
			store.query("c", "email", &json!({ "nested": 1 })).await,
			Err(DbError::InvalidQuery(_))
		));
	}

	#[tokio::test]
	async fn non_object_bodies_rejected() {
		let (store, _dir) = store().await;
		assert!(store.add("c", json!([1, 2])).await.is_err());
	}

	#[tokio::test]
	async fn delete_is_idempotent() {
		let (store, _dir) = store().await;
		store.set("c", "k", json!({})).await.unwrap();
		store.delete("c", "k").await.unwrap();
		store.delete("c", "k").await.unwrap();
		assert!(store.get("c", "k").await.unwrap().is_none());
		store.ping().await.unwrap();
	}
}
