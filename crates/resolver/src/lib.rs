//! Query resolution engine for CampusDesk.
//!
//! Two components, leaves first:
//! - [`KnowledgeIndex`] — loads the verified knowledge snapshot and exposes
//!   lookup-by-text with a deterministic matching policy.
//! - [`QueryResolver`] — orchestrates one request: validate, consult the
//!   index, escalate on miss, return a structured [`Resolution`].
//!
//! [`Resolution`]: campusdesk_core::Resolution

pub mod index;
pub mod resolver;

pub use index::KnowledgeIndex;
pub use resolver::QueryResolver;
