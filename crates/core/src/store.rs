//! Store trait — the resolver's only window onto persistence.
//!
//! The document store is modeled as an injected capability rather than a
//! process-wide handle, so any backend (or a test fake) can stand behind it.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::knowledge::KnowledgeEntry;
use crate::query::{NewQueryRecord, QueryRecord};

/// The core KnowledgeStore trait.
///
/// Implementations: SQLite (production), in-memory (testing/ephemeral).
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Read a snapshot of every entry a curator has marked verified.
    ///
    /// The verified filter is the store's responsibility; unverified drafts
    /// never cross this boundary.
    async fn read_verified_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError>;

    /// Append one escalation record to the query log.
    ///
    /// The store assigns `id` and `created_at` at write time; the returned
    /// record is exactly what was durably written. Appends are independent
    /// across requests and carry no cross-record ordering guarantee.
    async fn append_query_record(
        &self,
        record: NewQueryRecord,
    ) -> Result<QueryRecord, StoreError>;
}
