//! QueryResolver — orchestrates a single resolution request.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use campusdesk_core::error::ResolveError;
use campusdesk_core::query::{NewQueryRecord, UNKNOWN_REQUESTER};
use campusdesk_core::resolve::{Resolution, ResolveRequest};
use campusdesk_core::store::KnowledgeStore;

use crate::index::KnowledgeIndex;

/// One resolution per request: validate, consult the index, escalate on miss.
///
/// Each request is a single linear pipeline with two terminal outcomes
/// (answered, escalated) and one entry error state (invalid input). No
/// retries happen here; transient store errors surface to the caller.
pub struct QueryResolver {
    index: KnowledgeIndex,
    store: Arc<dyn KnowledgeStore>,
}

impl QueryResolver {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            index: KnowledgeIndex::new(Arc::clone(&store)),
            store,
        }
    }

    /// Cache the verified snapshot for up to `ttl` between store reads.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.index = self.index.with_cache_ttl(ttl);
        self
    }

    /// Resolve one request.
    ///
    /// A request yields either exactly one matched answer or exactly one
    /// escalation record — never both, never neither. The escalated outcome
    /// is only returned after the record is durably appended.
    pub async fn resolve(&self, request: ResolveRequest) -> Result<Resolution, ResolveError> {
        if request.question.trim().is_empty() {
            return Err(ResolveError::InvalidRequest);
        }

        // Explicit default rule, applied at validation time.
        let student_email = request
            .student_email
            .unwrap_or_else(|| UNKNOWN_REQUESTER.into());

        if let Some(answer) = self.index.find_match(&request.question).await? {
            debug!("question answered from knowledge base");
            return Ok(Resolution::answered(answer));
        }

        let record = NewQueryRecord::escalated(request.question, student_email);
        let persisted = self
            .store
            .append_query_record(record)
            .await
            .map_err(ResolveError::EscalationWriteFailed)?;

        info!(record_id = %persisted.id, "question escalated to admin queue");
        Ok(Resolution::escalated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use campusdesk_core::error::StoreError;
    use campusdesk_core::knowledge::KnowledgeEntry;
    use campusdesk_core::query::{NO_VERIFIED_MATCH, QueryRecord, QueryStatus};
    use campusdesk_store::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store stub with injectable failures and interaction counters.
    #[derive(Default)]
    struct FlakyStore {
        entries: Vec<KnowledgeEntry>,
        fail_reads: bool,
        fail_appends: bool,
        reads: AtomicUsize,
        appends: AtomicUsize,
    }

    #[async_trait]
    impl KnowledgeStore for FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn read_verified_entries(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(StoreError::Storage("read refused".into()));
            }
            Ok(self.entries.clone())
        }

        async fn append_query_record(
            &self,
            record: NewQueryRecord,
        ) -> Result<QueryRecord, StoreError> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            if self.fail_appends {
                return Err(StoreError::Storage("append refused".into()));
            }
            Ok(QueryRecord {
                id: "q_test".into(),
                question_text: record.question_text,
                student_email: record.student_email,
                status: record.status,
                escalation_reason: record.escalation_reason,
                created_at: chrono::Utc::now(),
            })
        }
    }

    async fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_entry(KnowledgeEntry::verified("refund policy", "See section 4"))
            .await;
        store
    }

    #[tokio::test]
    async fn matched_question_returns_internal_answer() {
        let store = seeded_store().await;
        let resolver = QueryResolver::new(store.clone());

        let resolution = resolver
            .resolve(ResolveRequest::new(
                "What's the refund policy for summer term?",
            ))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::answered("See section 4"));
        // A match has no side effects.
        assert!(store.query_records().await.is_empty());
    }

    #[tokio::test]
    async fn unmatched_question_escalates_with_one_record() {
        let store = seeded_store().await;
        let resolver = QueryResolver::new(store.clone());

        let resolution = resolver
            .resolve(ResolveRequest::new("How do I reset my password?"))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::escalated());

        let log = store.query_records().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].question_text, "How do I reset my password?");
        assert_eq!(log[0].status, QueryStatus::EscalatedToAdmin);
        assert_eq!(log[0].escalation_reason, NO_VERIFIED_MATCH);
    }

    #[tokio::test]
    async fn omitted_email_defaults_to_unknown() {
        let store = seeded_store().await;
        let resolver = QueryResolver::new(store.clone());

        resolver
            .resolve(ResolveRequest::new("Where do I park?"))
            .await
            .unwrap();

        assert_eq!(store.query_records().await[0].student_email, "unknown");
    }

    #[tokio::test]
    async fn provided_email_is_recorded() {
        let store = seeded_store().await;
        let resolver = QueryResolver::new(store.clone());

        resolver
            .resolve(
                ResolveRequest::new("Where do I park?").with_student_email("kim@example.edu"),
            )
            .await
            .unwrap();

        assert_eq!(
            store.query_records().await[0].student_email,
            "kim@example.edu"
        );
    }

    #[tokio::test]
    async fn empty_question_is_rejected_without_store_access() {
        let store = Arc::new(FlakyStore::default());
        let resolver = QueryResolver::new(store.clone());

        let err = resolver.resolve(ResolveRequest::new("")).await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRequest));

        let err = resolver
            .resolve(ResolveRequest::new("   \t  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRequest));

        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(store.appends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_failure_surfaces_as_store_unavailable() {
        let store = Arc::new(FlakyStore {
            fail_reads: true,
            ..FlakyStore::default()
        });
        let resolver = QueryResolver::new(store.clone());

        let err = resolver
            .resolve(ResolveRequest::new("Any question"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::StoreUnavailable(_)));
        // The miss was never confirmed, so nothing was appended.
        assert_eq!(store.appends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn append_failure_surfaces_as_escalation_write_failed() {
        let store = Arc::new(FlakyStore {
            fail_appends: true,
            ..FlakyStore::default()
        });
        let resolver = QueryResolver::new(store.clone());

        let err = resolver
            .resolve(ResolveRequest::new("Any question"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::EscalationWriteFailed(_)));
        assert_eq!(store.appends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_calls_return_the_same_match() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_entry(KnowledgeEntry::verified("pay", "General payment info"))
            .await;
        store
            .insert_entry(KnowledgeEntry::verified("payment deadline", "Pay by August 15"))
            .await;
        let resolver = QueryResolver::new(store.clone());

        let question = "what is the payment deadline";
        let first = resolver
            .resolve(ResolveRequest::new(question))
            .await
            .unwrap();
        let second = resolver
            .resolve(ResolveRequest::new(question))
            .await
            .unwrap();

        assert_eq!(first, Resolution::answered("Pay by August 15"));
        assert_eq!(first, second);
    }
}
