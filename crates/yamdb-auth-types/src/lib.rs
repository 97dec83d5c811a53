//! Auth types shared across YaMDb crates.
//!
//! Provides JWT encoding and validation, the bearer `Identity` extractors and
//! the permission predicates that gate every route.

pub mod identity;
pub mod permission;
pub mod token;
