//! Escalation records appended to the query log when no match is found.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requester identity recorded when the caller did not provide one.
pub const UNKNOWN_REQUESTER: &str = "unknown";

/// Escalation reason recorded on every record this system produces.
pub const NO_VERIFIED_MATCH: &str = "No verified data found";

/// Terminal status of a query log record.
///
/// The resolver has exactly one terminal status in scope: hand-off to the
/// administration queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    #[serde(rename = "ESC_ADMIN")]
    EscalatedToAdmin,
}

impl QueryStatus {
    /// Persisted wire form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStatus::EscalatedToAdmin => "ESC_ADMIN",
        }
    }
}

/// Input to the query-log append. The store assigns `id` and `created_at`
/// at write time, returning the full [`QueryRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueryRecord {
    pub question_text: String,

    #[serde(rename = "studentEmail")]
    pub student_email: String,

    pub status: QueryStatus,

    pub escalation_reason: String,
}

impl NewQueryRecord {
    /// Build the one record shape this system produces: an escalation of an
    /// unmatched question.
    pub fn escalated(
        question_text: impl Into<String>,
        student_email: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            student_email: student_email.into(),
            status: QueryStatus::EscalatedToAdmin,
            escalation_reason: NO_VERIFIED_MATCH.into(),
        }
    }
}

/// A persisted escalation record.
///
/// Created exactly once per unmatched request; never mutated or deleted by
/// this system. Downstream triage is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Store-assigned record id.
    pub id: String,

    /// The original question, verbatim.
    pub question_text: String,

    /// Requester identity, or [`UNKNOWN_REQUESTER`].
    #[serde(rename = "studentEmail")]
    pub student_email: String,

    pub status: QueryStatus,

    pub escalation_reason: String,

    /// Assigned by the store at write time.
    pub created_at: DateTime<Utc>,
}
