//! SQLite backend for the knowledge base and query log.
//!
//! A single database file with two tables:
//! - `knowledge_base` — curated entries (`question_intent`, `answer`, `verified`)
//! - `queries` — append-only escalation log
//!
//! The query log is never updated or deleted by this backend.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use campusdesk_core::error::StoreError;
use campusdesk_core::knowledge::KnowledgeEntry;
use campusdesk_core::query::{NewQueryRecord, QueryRecord, QueryStatus};
use campusdesk_core::store::KnowledgeStore;

/// A production SQLite store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations — idempotent table and index creation.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS knowledge_base (
                id              TEXT PRIMARY KEY,
                question_intent TEXT NOT NULL,
                answer          TEXT NOT NULL,
                verified        INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("knowledge_base table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_knowledge_verified ON knowledge_base(verified)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("verified index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queries (
                id                TEXT PRIMARY KEY,
                question_text     TEXT NOT NULL,
                student_email     TEXT NOT NULL,
                status            TEXT NOT NULL,
                escalation_reason TEXT NOT NULL,
                created_at        TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("queries table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_queries_created_at ON queries(created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("created_at index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Insert a curated knowledge base entry, returning its id.
    ///
    /// Curation happens out-of-band of the resolver; this is the surface the
    /// `kb` CLI commands use.
    pub async fn add_entry(&self, entry: &KnowledgeEntry) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO knowledge_base (id, question_intent, answer, verified) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&id)
        .bind(&entry.intent)
        .bind(&entry.answer)
        .bind(entry.verified)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT entry failed: {e}")))?;

        debug!(intent = %entry.intent, "stored knowledge entry {id}");
        Ok(id)
    }

    /// All entries, verified or not, ordered by intent.
    pub async fn list_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT question_intent, answer, verified FROM knowledge_base \
             ORDER BY question_intent",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("List entries: {e}")))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// The escalation log, oldest first (test support).
    pub async fn list_query_records(&self) -> Result<Vec<QueryRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM queries ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("List queries: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<KnowledgeEntry, StoreError> {
        let intent: String = row
            .try_get("question_intent")
            .map_err(|e| StoreError::QueryFailed(format!("question_intent column: {e}")))?;
        let answer: String = row
            .try_get("answer")
            .map_err(|e| StoreError::QueryFailed(format!("answer column: {e}")))?;
        let verified: bool = row
            .try_get("verified")
            .map_err(|e| StoreError::QueryFailed(format!("verified column: {e}")))?;

        Ok(KnowledgeEntry {
            intent,
            answer,
            verified,
        })
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<QueryRecord, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let question_text: String = row
            .try_get("question_text")
            .map_err(|e| StoreError::QueryFailed(format!("question_text column: {e}")))?;
        let student_email: String = row
            .try_get("student_email")
            .map_err(|e| StoreError::QueryFailed(format!("student_email column: {e}")))?;
        let status_str: String = row
            .try_get("status")
            .map_err(|e| StoreError::QueryFailed(format!("status column: {e}")))?;
        let escalation_reason: String = row
            .try_get("escalation_reason")
            .map_err(|e| StoreError::QueryFailed(format!("escalation_reason column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

        let status = match status_str.as_str() {
            "ESC_ADMIN" => QueryStatus::EscalatedToAdmin,
            other => {
                return Err(StoreError::QueryFailed(format!(
                    "Unknown query status: '{other}'"
                )));
            }
        };

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::QueryFailed(format!("created_at parse: {e}")))?;

        Ok(QueryRecord {
            id,
            question_text,
            student_email,
            status,
            escalation_reason,
            created_at,
        })
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn read_verified_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT question_intent, answer, verified FROM knowledge_base WHERE verified = 1",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("Verified read: {e}")))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn append_query_record(
        &self,
        record: NewQueryRecord,
    ) -> Result<QueryRecord, StoreError> {
        // Server-assigned fields: the store stamps both id and created_at.
        let persisted = QueryRecord {
            id: Uuid::new_v4().to_string(),
            question_text: record.question_text,
            student_email: record.student_email,
            status: record.status,
            escalation_reason: record.escalation_reason,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO queries (id, question_text, student_email, status, escalation_reason, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&persisted.id)
        .bind(&persisted.question_text)
        .bind(&persisted.student_email)
        .bind(persisted.status.as_str())
        .bind(&persisted.escalation_reason)
        .bind(persisted.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT query record failed: {e}")))?;

        debug!(record_id = %persisted.id, "escalation appended to query log");
        Ok(persisted)
    }
}
