use std::collections::HashSet;

use thiserror::Error;

use crate::models::RatingEntry;

use super::explainer::{explain, Explanation, DEFAULT_TOP_K};
use super::genre_index::GenreIndex;
use super::preference::{derive_preference, PreferenceVector};
use super::scorer::score_titles;

/// Number of titles recommended unless configured otherwise
pub const DEFAULT_TOP_N: usize = 5;

/// Conditions under which no recommendation can be produced.
///
/// None of these are failures of the engine itself; callers turn them into a
/// message for the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecommenderError {
    #[error("no ratings found")]
    NoRatingsProvided,
    #[error("no ratings matched the catalog")]
    NoMatchingRatings,
    #[error("nothing left to recommend")]
    NoRecommendationsAvailable,
}

/// Knobs for a recommendation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    /// Maximum number of titles returned
    pub top_n: usize,
    /// Maximum number of genres in each explanation
    pub top_k: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A recommended title with its score and explanation
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub score: f64,
    pub explanation: Explanation,
}

/// Output of a recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub preference: PreferenceVector,
    pub items: Vec<Recommendation>,
}

/// Content-based recommender over a prebuilt genre index
pub struct Recommender<'a> {
    index: &'a GenreIndex,
    options: RecommendOptions,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender with default options
    pub fn new(index: &'a GenreIndex) -> Self {
        Self::with_options(index, RecommendOptions::default())
    }

    pub fn with_options(index: &'a GenreIndex, options: RecommendOptions) -> Self {
        Self { index, options }
    }

    /// Derives the user's preference vector, scores every unrated title and
    /// explains the top `top_n`.
    ///
    /// Every title named in `ratings` is excluded from the output, whether or
    /// not it contributed to the preference vector.
    pub fn recommend(&self, ratings: &[RatingEntry]) -> Result<Recommendations, RecommenderError> {
        let preference = derive_preference(ratings, self.index)?;

        let rated: HashSet<&str> = ratings.iter().map(|r| r.title.as_str()).collect();
        let scored = score_titles(self.index, &preference, &rated, self.options.top_n);

        if scored.is_empty() {
            return Err(RecommenderError::NoRecommendationsAvailable);
        }

        let items = scored
            .into_iter()
            .map(|s| {
                let explanation = explain(&s.title, self.index, &preference, self.options.top_k);
                Recommendation {
                    title: s.title,
                    score: s.score,
                    explanation,
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            ratings = ratings.len(),
            recommended = items.len(),
            top_n = self.options.top_n,
            "Recommendations generated"
        );

        Ok(Recommendations { preference, items })
    }
}
