//! SQLite chunk store with brute-force cosine similarity search
//!
//! Each row is one chunk plus its embedding, stored as a little-endian `f32`
//! blob. Search scans the owner's rows (or every row) and ranks in memory.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkFilter, RetrievedMatch};

use super::chunk_store::ChunkStore;

/// SQLite-backed chunk store
#[derive(Clone)]
pub struct SqliteChunkStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteChunkStore {
    /// Create or open the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )
        .map_err(|e| Error::storage(format!("Failed to set pragmas: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;

        tracing::info!("Opened chunk store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS document_chunks (
                id TEXT PRIMARY KEY,
                chunk TEXT NOT NULL,
                tag_name TEXT,
                filename TEXT NOT NULL,
                page_number INTEGER NOT NULL,
                paragraph_number INTEGER NOT NULL,
                username TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_document_chunks_username ON document_chunks(username);
            CREATE INDEX IF NOT EXISTS idx_document_chunks_filename ON document_chunks(filename, username);
            "#,
        )
        .map_err(|e| Error::storage(format!("Failed to create tables: {}", e)))?;

        Ok(())
    }

    /// Insert chunks in one transaction
    pub fn insert_blocking(&self, chunks: &[Chunk]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        insert_rows(&tx, chunks)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete chunks matching the filter
    pub fn delete_blocking(&self, filter: &ChunkFilter) -> Result<usize> {
        let conn = self.conn.lock();
        delete_rows(&conn, filter)
    }

    /// Delete a file's previous chunks and insert the new ones atomically
    pub fn replace_blocking(&self, filename: &str, owner: &str, chunks: &[Chunk]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let removed = delete_rows(
            &tx,
            &ChunkFilter {
                filename: Some(filename.to_string()),
                tag: None,
                owner: owner.to_string(),
            },
        )?;
        insert_rows(&tx, chunks)?;

        tx.commit()?;
        Ok(removed)
    }

    /// Rank stored chunks by cosine similarity to `query`
    pub fn search_blocking(
        &self,
        query: &[f32],
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock();
        let base = "SELECT chunk, tag_name, filename, page_number, paragraph_number, username, embedding \
                    FROM document_chunks";

        let mut matches = if let Some(owner) = owner {
            let mut stmt = conn.prepare(&format!("{} WHERE username = ?1 ORDER BY rowid", base))?;
            let rows = stmt.query_map(params![owner], |row| row_to_match(row, query))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(&format!("{} ORDER BY rowid", base))?;
            let rows = stmt.query_map([], |row| row_to_match(row, query))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        // Stable sort keeps insertion order among equal scores
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit);
        Ok(matches)
    }

    /// Count stored chunks
    pub fn count_blocking(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM document_chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(SqliteChunkStore) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| Error::internal(format!("Storage task failed: {}", e)))?
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        let chunks = chunks.to_vec();
        self.run_blocking(move |store| store.insert_blocking(&chunks)).await
    }

    async fn delete(&self, filter: &ChunkFilter) -> Result<usize> {
        let filter = filter.clone();
        self.run_blocking(move |store| store.delete_blocking(&filter)).await
    }

    async fn replace_document(&self, filename: &str, owner: &str, chunks: &[Chunk]) -> Result<usize> {
        let (filename, owner, chunks) = (filename.to_string(), owner.to_string(), chunks.to_vec());
        self.run_blocking(move |store| store.replace_blocking(&filename, &owner, &chunks))
            .await
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        let query = query_embedding.to_vec();
        let owner = owner.map(str::to_string);
        self.run_blocking(move |store| store.search_blocking(&query, owner.as_deref(), limit))
            .await
    }

    async fn len(&self) -> Result<usize> {
        self.run_blocking(|store| store.count_blocking()).await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

fn insert_rows(conn: &Connection, chunks: &[Chunk]) -> Result<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR REPLACE INTO document_chunks (
            id, chunk, tag_name, filename, page_number, paragraph_number,
            username, content_hash, embedding, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )?;

    let now = Utc::now().to_rfc3339();
    for chunk in chunks {
        if chunk.embedding.is_empty() {
            return Err(Error::storage(format!(
                "Chunk {} of {} has no embedding",
                chunk.paragraph_number, chunk.filename
            )));
        }

        stmt.execute(params![
            chunk.id.to_string(),
            chunk.text,
            chunk.tag,
            chunk.filename,
            chunk.page_number,
            chunk.paragraph_number,
            chunk.owner,
            chunk.content_hash,
            encode_embedding(&chunk.embedding),
            &now,
        ])?;
    }

    Ok(())
}

fn delete_rows(conn: &Connection, filter: &ChunkFilter) -> Result<usize> {
    let mut conditions = vec!["username = ?"];
    let mut values = vec![filter.owner.as_str()];

    if let Some(filename) = &filter.filename {
        conditions.push("filename = ?");
        values.push(filename);
    }
    if let Some(tag) = &filter.tag {
        conditions.push("tag_name = ?");
        values.push(tag);
    }

    let sql = format!("DELETE FROM document_chunks WHERE {}", conditions.join(" AND "));
    let deleted = conn.execute(&sql, params_from_iter(values))?;
    Ok(deleted)
}

fn row_to_match(row: &rusqlite::Row, query: &[f32]) -> rusqlite::Result<RetrievedMatch> {
    let blob: Vec<u8> = row.get(6)?;
    let embedding = decode_embedding(&blob);

    Ok(RetrievedMatch {
        chunk: row.get(0)?,
        tag_name: row.get(1)?,
        filename: row.get(2)?,
        page_number: row.get(3)?,
        paragraph_number: row.get(4)?,
        owner: row.get(5)?,
        similarity: cosine_similarity(query, &embedding),
    })
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Cosine similarity; 0.0 for mismatched or zero-length vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Document, FileType};

    fn document(filename: &str, owner: &str, tag: Option<&str>) -> Document {
        Document {
            filename: filename.to_string(),
            owner: owner.to_string(),
            tag: tag.map(str::to_string),
            file_type: FileType::Pdf,
            text: String::new(),
            content_hash: "hash".to_string(),
        }
    }

    fn chunk(doc: &Document, text: &str, n: u32, embedding: Vec<f32>) -> Chunk {
        Chunk::new(doc, text.to_string(), n, 1).with_embedding(embedding)
    }

    fn seeded_store() -> SqliteChunkStore {
        let store = SqliteChunkStore::in_memory().unwrap();
        let lease = document("lease.pdf", "ana", Some("leases"));
        let nda = document("nda.pdf", "ben", None);

        store
            .insert_blocking(&[
                chunk(&lease, "rent is due monthly", 1, vec![1.0, 0.0]),
                chunk(&lease, "term is 24 months", 2, vec![0.6, 0.8]),
                chunk(&nda, "confidentiality for 5 years", 1, vec![0.0, 1.0]),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_embedding_blob_round_trip() {
        let values = vec![0.25, -1.5, 3.0];
        assert_eq!(decode_embedding(&encode_embedding(&values)), values);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_search_ranks_and_limits() {
        let store = seeded_store();
        let matches = store.search_blocking(&[1.0, 0.0], None, 2).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].chunk, "rent is due monthly");
        assert_eq!(matches[0].paragraph_number, 1);
        assert_eq!(matches[0].tag_name.as_deref(), Some("leases"));
        assert_eq!(matches[1].chunk, "term is 24 months");
    }

    #[test]
    fn test_owner_filter() {
        let store = seeded_store();

        let all = store.search_blocking(&[0.0, 1.0], None, 10).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].owner, "ben");

        let ana = store.search_blocking(&[0.0, 1.0], Some("ana"), 10).unwrap();
        assert_eq!(ana.len(), 2);
        assert!(ana.iter().all(|m| m.owner == "ana"));

        assert!(store.search_blocking(&[0.0, 1.0], Some("nobody"), 10).unwrap().is_empty());
        assert!(store.search_blocking(&[0.0, 1.0], None, 0).unwrap().is_empty());
    }

    #[test]
    fn test_delete_by_filename_is_owner_scoped() {
        let store = seeded_store();
        let other = document("lease.pdf", "ben", None);
        store
            .insert_blocking(&[chunk(&other, "ben's lease", 1, vec![1.0, 1.0])])
            .unwrap();

        let deleted = store
            .delete_blocking(&ChunkFilter {
                filename: Some("lease.pdf".to_string()),
                tag: None,
                owner: "ana".to_string(),
            })
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(store.count_blocking().unwrap(), 2);
        let remaining = store.search_blocking(&[1.0, 1.0], None, 10).unwrap();
        assert!(remaining.iter().any(|m| m.chunk == "ben's lease"));
    }

    #[test]
    fn test_delete_by_tag() {
        let store = seeded_store();
        let deleted = store
            .delete_blocking(&ChunkFilter {
                filename: None,
                tag: Some("leases".to_string()),
                owner: "ana".to_string(),
            })
            .unwrap();
        assert_eq!(deleted, 2);
    }

    #[test]
    fn test_replace_document() {
        let store = seeded_store();
        let lease = document("lease.pdf", "ana", None);

        let removed = store
            .replace_blocking("lease.pdf", "ana", &[chunk(&lease, "new terms", 1, vec![1.0, 0.0])])
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.count_blocking().unwrap(), 2);
    }

    #[test]
    fn test_insert_requires_embedding() {
        let store = SqliteChunkStore::in_memory().unwrap();
        let doc = document("a.pdf", "ana", None);
        let err = store
            .insert_blocking(&[Chunk::new(&doc, "text".to_string(), 1, 1)])
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_async_trait_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteChunkStore::open(dir.path().join("nested").join("chunks.db")).unwrap();
        let doc = document("a.pdf", "ana", None);

        store
            .insert_chunks(&[chunk(&doc, "clause", 1, vec![0.5, 0.5])])
            .await
            .unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
        assert!(!store.is_empty().await.unwrap());

        let matches = store.search(&[0.5, 0.5], Some("ana"), 5).await.unwrap();
        assert_eq!(matches[0].filename, "a.pdf");
    }
}
