//! KnowledgeIndex — lookup of a free-text question against the verified
//! knowledge base.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use campusdesk_core::error::ResolveError;
use campusdesk_core::knowledge::KnowledgeEntry;
use campusdesk_core::store::KnowledgeStore;

/// Read side of the resolution engine.
///
/// Matching is a pure function over a snapshot of verified entries, fetched
/// once per lookup (or served from the optional bounded-TTL cache).
pub struct KnowledgeIndex {
    store: Arc<dyn KnowledgeStore>,
    cache: Option<SnapshotCache>,
}

/// Cached verified snapshot. A snapshot older than `ttl` is never served, so
/// staleness is bounded by the configured interval.
struct SnapshotCache {
    ttl: Duration,
    slot: RwLock<Option<(Instant, Arc<Vec<KnowledgeEntry>>)>>,
}

impl KnowledgeIndex {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store, cache: None }
    }

    /// Cache the verified snapshot for up to `ttl` between store reads.
    /// A zero `ttl` leaves caching disabled.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| SnapshotCache {
            ttl,
            slot: RwLock::new(None),
        });
        self
    }

    /// Look up the answer for `question_text`.
    ///
    /// An entry matches when its intent is a case-insensitive substring of
    /// the question. When several verified entries match, the longest intent
    /// wins (most specific); length ties fall to the lexicographically
    /// smallest intent, so the result never depends on store iteration order.
    pub async fn find_match(&self, question_text: &str) -> Result<Option<String>, ResolveError> {
        let snapshot = self.verified_snapshot().await?;
        let matched = select_match(&snapshot, question_text);
        if let Some(entry) = matched {
            debug!(intent = %entry.intent, "question matched verified entry");
        }
        Ok(matched.map(|e| e.answer.clone()))
    }

    async fn verified_snapshot(&self) -> Result<Arc<Vec<KnowledgeEntry>>, ResolveError> {
        let Some(cache) = &self.cache else {
            let entries = self
                .store
                .read_verified_entries()
                .await
                .map_err(ResolveError::StoreUnavailable)?;
            return Ok(Arc::new(entries));
        };

        if let Some((fetched_at, snapshot)) = cache.slot.read().await.as_ref() {
            if fetched_at.elapsed() < cache.ttl {
                return Ok(Arc::clone(snapshot));
            }
        }

        let entries = self
            .store
            .read_verified_entries()
            .await
            .map_err(ResolveError::StoreUnavailable)?;
        let snapshot = Arc::new(entries);
        *cache.slot.write().await = Some((Instant::now(), Arc::clone(&snapshot)));
        debug!(entries = snapshot.len(), "verified snapshot refreshed");
        Ok(snapshot)
    }
}

/// Select the winning entry for a question from a snapshot.
///
/// Tie-break order: longest intent, then lexicographically smallest intent,
/// then lexicographically smallest answer. The last key makes the selection
/// a total order even when curators create duplicate intents.
fn select_match<'a>(
    entries: &'a [KnowledgeEntry],
    question_text: &str,
) -> Option<&'a KnowledgeEntry> {
    let question = question_text.to_lowercase();
    entries
        .iter()
        .filter(|e| e.verified && !e.intent.is_empty())
        .filter(|e| question.contains(&e.intent.to_lowercase()))
        .min_by(|a, b| {
            b.intent
                .len()
                .cmp(&a.intent.len())
                .then_with(|| a.intent.cmp(&b.intent))
                .then_with(|| a.answer.cmp(&b.answer))
        })
}
