//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the user list data access contract.
//! - Isolate the storage format from service orchestration.
//!
//! # Invariants
//! - Write paths validate every record before persistence.
//! - Users are persisted as one flat serialized list.

pub mod user_repo;
