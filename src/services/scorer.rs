use std::collections::HashSet;

use serde::Serialize;

use super::genre_index::GenreIndex;
use super::preference::PreferenceVector;

/// A catalog title with its affinity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTitle {
    pub title: String,
    pub score: f64,
}

/// Dot product of an indicator row with the preference weights
pub fn dot(row: &[u8], preference: &PreferenceVector) -> f64 {
    row.iter()
        .zip(preference.weights())
        .map(|(&indicator, &weight)| f64::from(indicator) * weight)
        .sum()
}

/// Scores every catalog title not in `exclude` and returns the best `top_n`.
///
/// Output is sorted by descending score. The sort is stable, so titles with
/// equal scores keep catalog order. An empty result means nothing is left to
/// recommend.
pub fn score_titles(
    index: &GenreIndex,
    preference: &PreferenceVector,
    exclude: &HashSet<&str>,
    top_n: usize,
) -> Vec<ScoredTitle> {
    let mut scored: Vec<ScoredTitle> = index
        .rows()
        .filter(|(title, _)| !exclude.contains(title))
        .map(|(title, row)| ScoredTitle {
            title: title.to_string(),
            score: dot(row, preference),
        })
        .collect();

    let eligible = scored.len();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n);

    tracing::debug!(
        eligible,
        excluded = exclude.len(),
        returned = scored.len(),
        "Titles scored"
    );

    scored
}
