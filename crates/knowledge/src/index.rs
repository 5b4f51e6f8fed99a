//! SQLite-backed vector index.

use crate::types::{CollectionInfo, IndexEntry, ScoredText};
use crate::vector_index::{cosine_distance, VectorIndex};
use chrono::{DateTime, Utc};
use grounded_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY,
    dimensions INTEGER NOT NULL,
    embedding_model TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    PRIMARY KEY (collection, id),
    FOREIGN KEY (collection) REFERENCES collections(name)
);
"#;

/// Vector index persisted in a single SQLite file.
///
/// Queries are exact: every entry of the collection is scored. That is the
/// right trade-off for a local corpus of a few thousand chunks.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteIndex").finish_non_exhaustive()
    }
}

impl SqliteIndex {
    /// Open (or create) the index database at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Index(format!("Failed to create index directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Index(format!("Failed to open SQLite index: {}", e)))?;

        tracing::debug!("Opened SQLite index at {:?}", db_path);
        Self::with_connection(conn)
    }

    /// Open a throwaway in-memory index.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Index(format!("Failed to open SQLite index: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::Index(format!("Failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Index("SQLite connection lock poisoned".to_string()))
    }

    fn require_collection(conn: &Connection, name: &str) -> AppResult<CollectionInfo> {
        read_collection(conn, name)?.ok_or_else(|| {
            AppError::Index(format!(
                "Collection '{}' does not exist. Run `grounded ingest` first.",
                name
            ))
        })
    }
}

impl VectorIndex for SqliteIndex {
    fn clear_collection(&mut self, name: &str) -> AppResult<bool> {
        let mut conn = self.conn()?;

        if read_collection(&conn, name)?.is_none() {
            tracing::debug!("Collection '{}' does not exist, nothing to clear", name);
            return Ok(false);
        }

        let tx = conn
            .transaction()
            .map_err(|e| AppError::Index(format!("Failed to begin transaction: {}", e)))?;

        let removed = tx
            .execute("DELETE FROM entries WHERE collection = ?1", params![name])
            .map_err(|e| AppError::Index(format!("Failed to delete entries: {}", e)))?;

        tx.execute("DELETE FROM collections WHERE name = ?1", params![name])
            .map_err(|e| AppError::Index(format!("Failed to delete collection: {}", e)))?;

        tx.commit()
            .map_err(|e| AppError::Index(format!("Failed to commit: {}", e)))?;

        tracing::info!("Removed collection '{}' ({} entries)", name, removed);
        Ok(true)
    }

    fn create_collection(
        &mut self,
        name: &str,
        dimensions: usize,
        embedding_model: &str,
    ) -> AppResult<CollectionInfo> {
        if dimensions == 0 {
            return Err(AppError::Index(
                "Collection dimensions must be greater than zero".to_string(),
            ));
        }

        let conn = self.conn()?;

        if read_collection(&conn, name)?.is_some() {
            return Err(AppError::Index(format!(
                "Collection '{}' already exists",
                name
            )));
        }

        let info = CollectionInfo {
            name: name.to_string(),
            dimensions,
            embedding_model: embedding_model.to_string(),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO collections (name, dimensions, embedding_model, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                info.name,
                info.dimensions as i64,
                info.embedding_model,
                info.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| AppError::Index(format!("Failed to create collection: {}", e)))?;

        tracing::debug!(
            "Created collection '{}' ({} dimensions, model {})",
            name,
            dimensions,
            embedding_model
        );

        Ok(info)
    }

    fn collection_info(&self, name: &str) -> AppResult<Option<CollectionInfo>> {
        let conn = self.conn()?;
        read_collection(&conn, name)
    }

    fn add(&mut self, collection: &str, entry: IndexEntry) -> AppResult<()> {
        let conn = self.conn()?;
        let info = Self::require_collection(&conn, collection)?;

        if entry.vector.len() != info.dimensions {
            return Err(AppError::Index(format!(
                "Entry '{}' has {} dimensions, collection '{}' expects {}",
                entry.id,
                entry.vector.len(),
                collection,
                info.dimensions
            )));
        }

        conn.execute(
            "INSERT OR REPLACE INTO entries (collection, id, text, embedding)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                collection,
                entry.id,
                entry.text,
                embedding_to_bytes(&entry.vector),
            ],
        )
        .map_err(|e| AppError::Index(format!("Failed to insert entry: {}", e)))?;

        Ok(())
    }

    fn query(&self, collection: &str, vector: &[f32], k: usize) -> AppResult<Vec<ScoredText>> {
        let conn = self.conn()?;
        let info = Self::require_collection(&conn, collection)?;

        if vector.len() != info.dimensions {
            return Err(AppError::Index(format!(
                "Query vector has {} dimensions, collection '{}' expects {}",
                vector.len(),
                collection,
                info.dimensions
            )));
        }

        if k == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = conn
            .prepare(
                "SELECT id, text, embedding FROM entries WHERE collection = ?1 ORDER BY rowid",
            )
            .map_err(|e| AppError::Index(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                ))
            })
            .map_err(|e| AppError::Index(format!("Failed to query entries: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (id, text, bytes) =
                row.map_err(|e| AppError::Index(format!("Failed to read entry: {}", e)))?;
            let embedding = bytes_to_embedding(&bytes)?;

            results.push(ScoredText {
                distance: cosine_distance(vector, &embedding),
                id,
                text,
            });
        }

        // Stable sort keeps insertion order among equal distances
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} entries from '{}' (requested top-{})",
            results.len(),
            collection,
            k
        );

        Ok(results)
    }

    fn count(&self, collection: &str) -> AppResult<usize> {
        let conn = self.conn()?;
        Self::require_collection(&conn, collection)?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM entries WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Index(format!("Failed to count entries: {}", e)))?;

        Ok(count as usize)
    }
}

fn read_collection(conn: &Connection, name: &str) -> AppResult<Option<CollectionInfo>> {
    let row = conn
        .query_row(
            "SELECT name, dimensions, embedding_model, created_at FROM collections WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| AppError::Index(format!("Failed to read collection '{}': {}", name, e)))?;

    let Some((name, dimensions, embedding_model, created_at)) = row else {
        return Ok(None);
    };

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| AppError::Index(format!("Invalid collection timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(Some(CollectionInfo {
        name,
        dimensions: dimensions as usize,
        embedding_model,
        created_at,
    }))
}

/// Convert embedding vector to little-endian bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert stored bytes back to an embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Index(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn index_with_collection(dimensions: usize) -> SqliteIndex {
        let mut index = SqliteIndex::open_in_memory().unwrap();
        index
            .create_collection("docs", dimensions, "test/model")
            .unwrap();
        index
    }

    #[test]
    fn test_clear_missing_collection_is_not_error() {
        let mut index = SqliteIndex::open_in_memory().unwrap();
        assert!(!index.clear_collection("missing").unwrap());
    }

    #[test]
    fn test_clear_removes_entries_and_metadata() {
        let mut index = index_with_collection(2);
        index
            .add("docs", IndexEntry::new("a", vec![1.0, 0.0], "alpha"))
            .unwrap();

        assert!(index.clear_collection("docs").unwrap());
        assert!(index.collection_info("docs").unwrap().is_none());

        index.create_collection("docs", 2, "test/model").unwrap();
        assert_eq!(index.count("docs").unwrap(), 0);
    }

    #[test]
    fn test_create_existing_collection_fails() {
        let mut index = index_with_collection(2);
        let err = index.create_collection("docs", 2, "test/model").unwrap_err();
        assert!(matches!(err, AppError::Index(_)));
    }

    #[test]
    fn test_query_orders_by_ascending_distance() {
        let mut index = index_with_collection(2);
        index
            .add("docs", IndexEntry::new("far", vec![0.0, 1.0], "far"))
            .unwrap();
        index
            .add("docs", IndexEntry::new("near", vec![1.0, 0.1], "near"))
            .unwrap();
        index
            .add("docs", IndexEntry::new("mid", vec![1.0, 1.0], "mid"))
            .unwrap();

        let hits = index.query("docs", &[1.0, 0.0], 3).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_query_respects_k() {
        let mut index = index_with_collection(2);
        for i in 0..5 {
            index
                .add(
                    "docs",
                    IndexEntry::new(format!("e{}", i), vec![1.0, i as f32], "text"),
                )
                .unwrap();
        }

        assert_eq!(index.query("docs", &[1.0, 0.0], 3).unwrap().len(), 3);
        assert!(index.query("docs", &[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = index_with_collection(2);
        index
            .add("docs", IndexEntry::new("first", vec![1.0, 0.0], "one"))
            .unwrap();
        index
            .add("docs", IndexEntry::new("second", vec![2.0, 0.0], "two"))
            .unwrap();

        let hits = index.query("docs", &[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].id, "first");
        assert_eq!(hits[1].id, "second");
    }

    #[test]
    fn test_duplicate_id_overwrites() {
        let mut index = index_with_collection(2);
        index
            .add("docs", IndexEntry::new("a", vec![1.0, 0.0], "old"))
            .unwrap();
        index
            .add("docs", IndexEntry::new("a", vec![0.0, 1.0], "new"))
            .unwrap();

        assert_eq!(index.count("docs").unwrap(), 1);
        let hits = index.query("docs", &[0.0, 1.0], 1).unwrap();
        assert_eq!(hits[0].text, "new");
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut index = index_with_collection(3);

        let err = index
            .add("docs", IndexEntry::new("a", vec![1.0, 0.0], "short"))
            .unwrap_err();
        assert!(matches!(err, AppError::Index(_)));

        let err = index.query("docs", &[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, AppError::Index(_)));
    }

    #[test]
    fn test_query_missing_collection_is_index_error() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let err = index.query("missing", &[1.0], 3).unwrap_err();
        assert!(matches!(err, AppError::Index(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_collections_are_isolated() {
        let mut index = index_with_collection(2);
        index.create_collection("other", 2, "test/model").unwrap();
        index
            .add("docs", IndexEntry::new("a", vec![1.0, 0.0], "in docs"))
            .unwrap();

        assert_eq!(index.count("docs").unwrap(), 1);
        assert_eq!(index.count("other").unwrap(), 0);
        assert!(index.query("other", &[1.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vectorstore").join("index.sqlite");

        {
            let mut index = SqliteIndex::open(&path).unwrap();
            index.create_collection("docs", 2, "test/model").unwrap();
            index
                .add("docs", IndexEntry::new("a", vec![0.5, -0.25], "kept"))
                .unwrap();
        }

        let index = SqliteIndex::open(&path).unwrap();
        let info = index.collection_info("docs").unwrap().unwrap();
        assert_eq!(info.dimensions, 2);
        assert_eq!(info.embedding_model, "test/model");

        let hits = index.query("docs", &[0.5, -0.25], 1).unwrap();
        assert_eq!(hits[0].text, "kept");
    }

    #[test]
    fn test_embedding_bytes_little_endian() {
        let bytes = embedding_to_bytes(&[1.0, -2.5]);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), vec![1.0, -2.5]);
        assert!(bytes_to_embedding(&[0, 1, 2]).is_err());
    }
}
