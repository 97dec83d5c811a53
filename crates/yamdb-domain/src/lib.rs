//! Domain types shared across the YaMDb crates.
//!
//! Pure types with no framework dependencies: pagination, roles, ratings and
//! field errors.

pub mod pagination;
pub mod rating;
pub mod user;
pub mod validation;
