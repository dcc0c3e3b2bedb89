use std::fmt::Display;

use serde::Serialize;

use super::genre_index::GenreIndex;
use super::preference::PreferenceVector;

/// Number of genres reported per explanation unless configured otherwise
pub const DEFAULT_TOP_K: usize = 3;

/// How much one genre adds to a title's score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreContribution {
    pub genre: String,
    pub contribution: f64,
}

/// Why a title was recommended
#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    /// Strongest contributing genres, strongest first. Never empty.
    Matches(Vec<GenreContribution>),
    /// The title shares no weighted genre with the user's ratings
    NoMatch,
}

impl Explanation {
    pub fn contributions(&self) -> &[GenreContribution] {
        match self {
            Explanation::Matches(c) => c,
            Explanation::NoMatch => &[],
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Explanation::Matches(_))
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Explanation::Matches(contributions) => {
                let parts: Vec<String> = contributions
                    .iter()
                    .map(|c| format!("{} ({:.2})", c.genre, c.contribution))
                    .collect();
                write!(f, "Top matches: {}", parts.join(", "))
            }
            Explanation::NoMatch => write!(f, "No strong genre match."),
        }
    }
}

/// Breaks a title's score down into per-genre contributions.
///
/// Only strictly positive contributions are kept, ordered by size with ties in
/// genre-universe order, and at most `top_k` of them. Titles unknown to the
/// index explain as [`Explanation::NoMatch`].
pub fn explain(
    title: &str,
    index: &GenreIndex,
    preference: &PreferenceVector,
    top_k: usize,
) -> Explanation {
    let Some(row) = index.row(title) else {
        return Explanation::NoMatch;
    };

    let mut contributions: Vec<GenreContribution> = index
        .universe()
        .iter()
        .zip(row)
        .zip(preference.weights())
        .map(|((genre, &indicator), &weight)| GenreContribution {
            genre: genre.clone(),
            contribution: f64::from(indicator) * weight,
        })
        .filter(|c| c.contribution > 0.0)
        .collect();

    contributions.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    contributions.truncate(top_k);

    if contributions.is_empty() {
        Explanation::NoMatch
    } else {
        Explanation::Matches(contributions)
    }
}
