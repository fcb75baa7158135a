//! # CampusDesk Core
//!
//! Domain types, traits, and error definitions for the CampusDesk query
//! resolution engine. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The document store is a trait here, not a concrete database. Backends live
//! in their own crate. This enables:
//! - Swapping backends via configuration
//! - Easy testing with in-memory/stub stores
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod query;
pub mod resolve;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ResolveError, Result, StoreError};
pub use knowledge::KnowledgeEntry;
pub use query::{NO_VERIFIED_MATCH, NewQueryRecord, QueryRecord, QueryStatus, UNKNOWN_REQUESTER};
pub use resolve::{ESCALATION_MESSAGE, Resolution, ResolveRequest};
pub use store::KnowledgeStore;
