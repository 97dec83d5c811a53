//! Page-number pagination.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across all list endpoints.
///
/// - `per_page`: 1–100, default 25
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    25
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `per_page` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// Zero-based page index, as expected by sea-orm paginators.
    pub fn index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }
}

/// List envelope: `{count, next, previous, results}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build the envelope for `results`, the items of `request.page` out of
    /// `count` in total. `uri` is the request path and query; links rewrite
    /// its `page` parameter.
    pub fn new(results: Vec<T>, count: u64, request: PageRequest, uri: &str) -> Self {
        let pages = count.div_ceil(u64::from(request.per_page.max(1)));
        let current = u64::from(request.page);

        let next = (current < pages).then(|| page_link(uri, current + 1));
        let previous = (current > 1 && current - 1 <= pages.max(1)).then(|| page_link(uri, current - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Rewrite the `page` query parameter of `uri`. Page 1 drops the parameter.
fn page_link(uri: &str, page: u64) -> String {
    let (path, query) = uri.split_once('?').unwrap_or((uri, ""));

    let mut params: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && *pair != "page" && !pair.starts_with("page="))
        .map(str::to_owned)
        .collect();
    if page > 1 {
        params.push(format!("page={page}"));
    }

    if params.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}
