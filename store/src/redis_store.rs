//! Redis-backed [`IndexStore`].
//!
//! Each document is one hash at key `doc:<doc_id>` with two fields, `nodes`
//! and `metadata`, holding the JSON payloads verbatim. Listing scans for
//! `doc:*` keys rather than keeping a secondary index, matching how the
//! original document store enumerates its documents.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::{Result, StoreError};
use crate::traits::{DocumentSummary, IndexStore, StoredIndex};

/// Every Redis round trip is bounded by this timeout.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

const KEY_PREFIX: &str = "doc:";
const FIELD_NODES: &str = "nodes";
const FIELD_METADATA: &str = "metadata";
const SCAN_BATCH: usize = 100;

/// Redis-backed document snapshot store.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to `redis_url` (e.g. `redis://127.0.0.1:6379`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the URL is invalid or the initial
    /// connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    fn key(doc_id: &str) -> String {
        format!("{KEY_PREFIX}{doc_id}")
    }

    async fn with_timeout<T>(fut: impl std::future::Future<Output = redis::RedisResult<T>>) -> Result<T> {
        tokio::time::timeout(OPERATION_TIMEOUT, fut)
            .await
            .map_err(|_| StoreError::Timeout {
                seconds: OPERATION_TIMEOUT.as_secs(),
            })?
            .map_err(StoreError::from)
    }
}

#[async_trait::async_trait]
impl IndexStore for RedisStore {
    async fn put(
        &self,
        doc_id: &str,
        nodes_json: &str,
        metadata_json: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = Self::key(doc_id);

        Self::with_timeout(conn.hset_multiple::<_, _, _, ()>(
            &key,
            &[(FIELD_NODES, nodes_json), (FIELD_METADATA, metadata_json)],
        ))
        .await?;

        if let Some(ttl) = ttl_seconds {
            Self::with_timeout(conn.expire::<_, ()>(&key, ttl as i64)).await?;
        }

        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<StoredIndex>> {
        let mut conn = self.conn.clone();
        let key = Self::key(doc_id);

        let fields: std::collections::HashMap<String, String> =
            Self::with_timeout(conn.hgetall(&key)).await?;

        if fields.is_empty() {
            return Ok(None);
        }

        let nodes_json = fields.get(FIELD_NODES).cloned().ok_or_else(|| StoreError::Corrupt {
            doc_id: doc_id.to_string(),
            reason: "missing `nodes` field".to_string(),
        })?;
        let metadata_json = fields
            .get(FIELD_METADATA)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt {
                doc_id: doc_id.to_string(),
                reason: "missing `metadata` field".to_string(),
            })?;

        Ok(Some(StoredIndex {
            nodes_json,
            metadata_json,
        }))
    }

    async fn exists(&self, doc_id: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let count: u64 = Self::with_timeout(conn.exists(Self::key(doc_id))).await?;
        Ok(count > 0)
    }

    async fn delete(&self, doc_id: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let count: u64 = Self::with_timeout(conn.del(Self::key(doc_id))).await?;
        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<DocumentSummary>> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next_cursor, batch): (u64, Vec<String>) = Self::with_timeout(redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(format!("{KEY_PREFIX}*"))
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn))
            .await?;
            keys.extend(batch);
            if next_cursor == 0 {
                break;
            }
            cursor = next_cursor;
        }

        let mut documents = Vec::with_capacity(keys.len());
        for key in keys {
            let metadata_json: Option<String> =
                Self::with_timeout(conn.hget(&key, FIELD_METADATA)).await?;
            if let Some(metadata_json) = metadata_json {
                let doc_id = key.trim_start_matches(KEY_PREFIX).to_string();
                documents.push(DocumentSummary {
                    doc_id,
                    metadata_json,
                });
            }
        }

        Ok(documents)
    }
}
