//! In-memory store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use campusdesk_core::error::StoreError;
use campusdesk_core::knowledge::KnowledgeEntry;
use campusdesk_core::query::{NewQueryRecord, QueryRecord};
use campusdesk_core::store::KnowledgeStore;

/// An in-memory store holding the knowledge base and query log in Vecs.
/// Nothing survives the process; use the SQLite backend for persistence.
pub struct InMemoryStore {
    entries: Arc<RwLock<Vec<KnowledgeEntry>>>,
    query_log: Arc<RwLock<Vec<QueryRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            query_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed a knowledge base entry (curator stand-in for tests).
    pub async fn insert_entry(&self, entry: KnowledgeEntry) {
        self.entries.write().await.push(entry);
    }

    /// Snapshot of the escalation log, oldest first.
    pub async fn query_records(&self) -> Vec<QueryRecord> {
        self.query_log.read().await.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn read_verified_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| e.verified).cloned().collect())
    }

    async fn append_query_record(
        &self,
        record: NewQueryRecord,
    ) -> Result<QueryRecord, StoreError> {
        let persisted = QueryRecord {
            id: Uuid::new_v4().to_string(),
            question_text: record.question_text,
            student_email: record.student_email,
            status: record.status,
            escalation_reason: record.escalation_reason,
            created_at: Utc::now(),
        };
        self.query_log.write().await.push(persisted.clone());
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_core::query::QueryStatus;

    #[tokio::test]
    async fn read_returns_only_verified_entries() {
        let store = InMemoryStore::new();
        store
            .insert_entry(KnowledgeEntry::verified("library hours", "8am to 10pm"))
            .await;
        store
            .insert_entry(KnowledgeEntry::draft("parking permit", "Apply at office B"))
            .await;

        let verified = store.read_verified_entries().await.unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].intent, "library hours");
    }

    #[tokio::test]
    async fn append_assigns_id_and_timestamp() {
        let store = InMemoryStore::new();
        let before = Utc::now();

        let persisted = store
            .append_query_record(NewQueryRecord::escalated("Where is room 204?", "unknown"))
            .await
            .unwrap();

        assert!(!persisted.id.is_empty());
        assert!(persisted.created_at >= before);
        assert_eq!(persisted.status, QueryStatus::EscalatedToAdmin);

        let log = store.query_records().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, persisted.id);
    }

    #[tokio::test]
    async fn appends_are_independent_records() {
        let store = InMemoryStore::new();
        let a = store
            .append_query_record(NewQueryRecord::escalated("first", "unknown"))
            .await
            .unwrap();
        let b = store
            .append_query_record(NewQueryRecord::escalated("second", "unknown"))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.query_records().await.len(), 2);
    }
}
