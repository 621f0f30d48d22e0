//! # Document Repository
//!
//! The five store primitives plus backup support.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Document Primitives                                 │
//! │                                                                         │
//! │  get_all(collection)        ──► every document, deserialized           │
//! │  get(collection, id)        ──► one document or None                   │
//! │  save(collection, id, doc)  ──► upsert (insert or full replace)        │
//! │  delete(collection, id)     ──► remove, reports whether it existed     │
//! │                                                                         │
//! │  export_all()               ──► every document across collections      │
//! │  restore_all(records)       ──► wipe + bulk insert (one transaction)   │
//! │  wipe()                     ──► factory reset                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above the store composes these primitives; there are no
//! entity-specific queries. Cross-document consistency (e.g. a sale plus
//! its shift append plus stock decrements) is the engine's responsibility,
//! which serializes mutations behind a single lock.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Backup Record
// =============================================================================

/// One document in a backup bundle.
///
/// Payloads travel as raw JSON values so a backup taken by one version can
/// be restored by another without the store knowing any entity's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub collection: String,
    pub id: String,
    pub payload: serde_json::Value,
}

// =============================================================================
// Documents Repository
// =============================================================================

/// Repository over the `documents` table.
#[derive(Debug, Clone)]
pub struct Documents {
    pool: SqlitePool,
}

impl Documents {
    pub fn new(pool: SqlitePool) -> Self {
        Documents { pool }
    }

    /// Fetches every document in a collection.
    ///
    /// Ordered by id for deterministic output; callers needing a business
    /// ordering (e.g. sales by date) sort in memory - collections here are
    /// single-shop sized.
    pub async fn get_all<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        let rows = sqlx::query("SELECT id, payload FROM documents WHERE collection = ? ORDER BY id")
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await?;

        debug!(collection = %collection, count = rows.len(), "Fetched collection");

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let payload: String = row.try_get("payload")?;
            docs.push(deserialize(collection, &id, &payload)?);
        }
        Ok(docs)
    }

    /// Fetches a single document by id, or `None` if absent.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let row = sqlx::query("SELECT payload FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload")?;
                Ok(Some(deserialize(collection, id, &payload)?))
            }
            None => Ok(None),
        }
    }

    /// Fetches a single document, erroring if it doesn't exist.
    pub async fn get_required<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> StoreResult<T> {
        self.get(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection.as_str(), id))
    }

    /// Upserts a document: insert if new, full replace if present.
    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        doc: &T,
    ) -> StoreResult<()> {
        let payload = serde_json::to_string(doc).map_err(|e| StoreError::Serialization {
            collection: collection.as_str().to_string(),
            id: id.to_string(),
            source: e,
        })?;

        sqlx::query(
            "INSERT INTO documents (collection, id, payload, updated_at)
             VALUES (?, ?, ?, datetime('now'))
             ON CONFLICT (collection, id)
             DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        debug!(collection = %collection, id = %id, "Saved document");
        Ok(())
    }

    /// Deletes a document. Returns whether it existed.
    pub async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        let existed = result.rows_affected() > 0;
        debug!(collection = %collection, id = %id, existed, "Deleted document");
        Ok(existed)
    }

    /// Counts the documents in a collection.
    pub async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    // -------------------------------------------------------------------------
    // Backup / Restore
    // -------------------------------------------------------------------------

    /// Exports every document across all collections.
    pub async fn export_all(&self) -> StoreResult<Vec<DocumentRecord>> {
        let rows = sqlx::query("SELECT collection, id, payload FROM documents ORDER BY collection, id")
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let collection: String = row.try_get("collection")?;
            let id: String = row.try_get("id")?;
            let payload: String = row.try_get("payload")?;
            let payload =
                serde_json::from_str(&payload).map_err(|e| StoreError::Serialization {
                    collection: collection.clone(),
                    id: id.clone(),
                    source: e,
                })?;
            records.push(DocumentRecord { collection, id, payload });
        }

        debug!(count = records.len(), "Exported all documents");
        Ok(records)
    }

    /// Restores a backup bundle: wipes the store, then inserts every record,
    /// all inside one transaction. A failed restore leaves the previous
    /// contents untouched.
    ///
    /// Records naming an unknown collection are rejected rather than
    /// silently dropped.
    pub async fn restore_all(&self, records: &[DocumentRecord]) -> StoreResult<()> {
        for record in records {
            if Collection::parse(&record.collection).is_none() {
                return Err(StoreError::Internal(format!(
                    "unknown collection in backup: {}",
                    record.collection
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents").execute(&mut *tx).await?;

        for record in records {
            let payload =
                serde_json::to_string(&record.payload).map_err(|e| StoreError::Serialization {
                    collection: record.collection.clone(),
                    id: record.id.clone(),
                    source: e,
                })?;
            sqlx::query(
                "INSERT INTO documents (collection, id, payload, updated_at)
                 VALUES (?, ?, ?, datetime('now'))",
            )
            .bind(&record.collection)
            .bind(&record.id)
            .bind(&payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(count = records.len(), "Restored backup");
        Ok(())
    }

    /// Factory reset: deletes every document in every collection.
    pub async fn wipe(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents").execute(&self.pool).await?;
        debug!("Wiped all documents");
        Ok(())
    }
}

fn deserialize<T: DeserializeOwned>(
    collection: Collection,
    id: &str,
    payload: &str,
) -> StoreResult<T> {
    serde_json::from_str(payload).map_err(|e| StoreError::Serialization {
        collection: collection.as_str().to_string(),
        id: id.to_string(),
        source: e,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
        name: String,
        value: i64,
    }

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_get_round_trip() {
        let docs = test_store().await.documents();
        let doc = Doc { id: "d1".into(), name: "first".into(), value: 42 };

        docs.save(Collection::Products, &doc.id, &doc).await.unwrap();

        let loaded: Option<Doc> = docs.get(Collection::Products, "d1").await.unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let docs = test_store().await.documents();
        let loaded: Option<Doc> = docs.get(Collection::Products, "nope").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let docs = test_store().await.documents();
        let mut doc = Doc { id: "d1".into(), name: "first".into(), value: 1 };

        docs.save(Collection::Products, &doc.id, &doc).await.unwrap();
        doc.value = 2;
        docs.save(Collection::Products, &doc.id, &doc).await.unwrap();

        let all: Vec<Doc> = docs.get_all(Collection::Products).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, 2);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let docs = test_store().await.documents();
        let doc = Doc { id: "d1".into(), name: "first".into(), value: 1 };

        docs.save(Collection::Products, &doc.id, &doc).await.unwrap();

        let sales: Vec<Doc> = docs.get_all(Collection::Sales).await.unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let docs = test_store().await.documents();
        let doc = Doc { id: "d1".into(), name: "first".into(), value: 1 };
        docs.save(Collection::Products, &doc.id, &doc).await.unwrap();

        assert!(docs.delete(Collection::Products, "d1").await.unwrap());
        assert!(!docs.delete(Collection::Products, "d1").await.unwrap());
    }

    #[tokio::test]
    async fn test_export_restore_cycle() {
        let docs = test_store().await.documents();
        docs.save(Collection::Products, "p1", &Doc { id: "p1".into(), name: "a".into(), value: 1 })
            .await
            .unwrap();
        docs.save(Collection::Sales, "s1", &Doc { id: "s1".into(), name: "b".into(), value: 2 })
            .await
            .unwrap();

        let backup = docs.export_all().await.unwrap();
        assert_eq!(backup.len(), 2);

        docs.wipe().await.unwrap();
        assert_eq!(docs.count(Collection::Products).await.unwrap(), 0);

        docs.restore_all(&backup).await.unwrap();
        assert_eq!(docs.count(Collection::Products).await.unwrap(), 1);
        assert_eq!(docs.count(Collection::Sales).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restore_rejects_unknown_collection() {
        let docs = test_store().await.documents();
        let bad = vec![DocumentRecord {
            collection: "aliens".into(),
            id: "x".into(),
            payload: serde_json::json!({}),
        }];

        assert!(docs.restore_all(&bad).await.is_err());
    }
}
