//! Error types for the CampusDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all CampusDesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Resolution errors ---
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of a single resolution request.
///
/// None of these are recovered locally with a fallback answer; all surface to
/// the caller as distinct signals so the transport can map them to status
/// codes.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The question was missing or empty after trimming. No store access
    /// has happened when this is returned.
    #[error("Question is required")]
    InvalidRequest,

    /// The knowledge base snapshot could not be read. Retryable by the
    /// caller; no side effects.
    #[error("Knowledge base unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The escalation record could not be appended after a confirmed miss.
    /// Retryable by the caller; the caller must not report an escalation.
    #[error("Failed to record escalation: {0}")]
    EscalationWriteFailed(#[source] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}
