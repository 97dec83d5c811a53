//! Shared axum and sea-orm plumbing for YaMDb services.

pub mod config;
pub mod error;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod time;
pub mod tracing;
