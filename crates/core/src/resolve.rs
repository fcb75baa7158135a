//! Request and result shapes for a single resolution.

use serde::{Deserialize, Serialize};

/// Fixed reply sent to the requester after an escalation is durably recorded.
pub const ESCALATION_MESSAGE: &str = "Your query has been forwarded to administration.";

/// A single resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// The free-text question. Must be non-empty after trimming.
    pub question: String,

    /// Optional requester identity; defaults to the `"unknown"` sentinel
    /// during validation when absent.
    #[serde(
        default,
        rename = "studentEmail",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_email: Option<String>,
}

impl ResolveRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            student_email: None,
        }
    }

    pub fn with_student_email(mut self, email: impl Into<String>) -> Self {
        self.student_email = Some(email.into());
        self
    }
}

/// The two terminal outcomes of a resolution.
///
/// Serializes directly to the wire contract:
/// `{"source": "INTERNAL_DB", "answer": ...}` on a match,
/// `{"source": "ESCALATED", "message": ...}` after an escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum Resolution {
    #[serde(rename = "INTERNAL_DB")]
    Answered { answer: String },

    #[serde(rename = "ESCALATED")]
    Escalated { message: String },
}

impl Resolution {
    pub fn answered(answer: impl Into<String>) -> Self {
        Resolution::Answered {
            answer: answer.into(),
        }
    }

    /// The escalation outcome with its fixed user-facing message.
    pub fn escalated() -> Self {
        Resolution::Escalated {
            message: ESCALATION_MESSAGE.into(),
        }
    }
}
