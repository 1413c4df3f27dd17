//! Flutter bridge crate for the user-management core.

pub mod api;
