//! Knowledge base entries — the verified facts the resolver answers from.

use serde::{Deserialize, Serialize};

/// A single curated knowledge base entry.
///
/// Entries are created and edited by a curator out-of-band; the resolver
/// only ever sees a read-only snapshot. Only entries with `verified = true`
/// are eligible for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// The topical text fragment the entry is indexed by. Non-empty,
    /// stored in its normalized form.
    #[serde(rename = "question_intent")]
    pub intent: String,

    /// Text returned verbatim when the entry matches.
    pub answer: String,

    /// Whether a curator has approved this entry for automatic serving.
    #[serde(default)]
    pub verified: bool,
}

impl KnowledgeEntry {
    /// A verified entry, ready to serve.
    pub fn verified(intent: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            answer: answer.into(),
            verified: true,
        }
    }

    /// An unverified draft entry.
    pub fn draft(intent: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            answer: answer.into(),
            verified: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serializes_under_persisted_field_name() {
        let entry = KnowledgeEntry::verified("refund policy", "See section 4");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"question_intent\":\"refund policy\""));
        assert!(json.contains("\"verified\":true"));
    }

    #[test]
    fn verified_defaults_to_false_when_absent() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"question_intent":"wifi","answer":"Use eduroam"}"#).unwrap();
        assert!(!entry.verified);
    }
}
