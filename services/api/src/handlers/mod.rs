use axum::http::Uri;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::Term;

pub mod actor;
pub mod auth;
pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;

/// Path and query of the request, the base for pagination links.
fn page_base(uri: &Uri) -> &str {
    uri.path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str())
}

/// Genre or category as rendered on the wire.
#[derive(Debug, Serialize)]
pub struct TermResponse {
    pub name: String,
    pub slug: String,
}

impl From<Term> for TermResponse {
    fn from(term: Term) -> Self {
        Self {
            name: term.name,
            slug: term.slug,
        }
    }
}

/// Tell an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
