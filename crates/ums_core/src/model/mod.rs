//! Domain model for managed user records.
//!
//! # Responsibility
//! - Define the canonical user record shared by list, form and storage.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - Every stored user is identified by a stable, non-empty `UserId`.
//! - `birth_date` is always kept in canonical Jalali form `jYYYY/jMM/jDD`.

pub mod user;
