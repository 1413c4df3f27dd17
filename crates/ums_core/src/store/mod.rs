//! Local key/value storage.
//!
//! # Responsibility
//! - Provide a browser-local-storage shaped API (`get/set/remove` by key).
//! - Offer a SQLite-backed store for persistent hosts and an in-memory store
//!   for hosts without durable storage.
//!
//! # Invariants
//! - Values are opaque strings; callers own their serialization format.
//! - `set_item` replaces any previous value for the key.

pub mod kv_store;

pub use kv_store::{KeyValueStore, MemoryKvStore, SqliteKvStore};
