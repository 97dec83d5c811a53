//! Average rating derived from review scores.

use std::collections::HashMap;

/// Arithmetic mean of `scores`, or `None` when there are none.
pub fn average_score(scores: &[i16]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    Some(sum as f64 / scores.len() as f64)
}

/// Mean score per title from `(title_id, score)` rows. Titles without rows
/// are absent, so their rating reads as `None`.
pub fn ratings_by_title(rows: impl IntoIterator<Item = (i32, i16)>) -> HashMap<i32, f64> {
    let mut scores: HashMap<i32, Vec<i16>> = HashMap::new();
    for (title_id, score) in rows {
        scores.entry(title_id).or_default().push(score);
    }
    scores
        .into_iter()
        .filter_map(|(title_id, scores)| average_score(&scores).map(|avg| (title_id, avg)))
        .collect()
}
