use serde::Serialize;

use crate::models::RatingEntry;

use super::genre_index::GenreIndex;
use super::recommendations::RecommenderError;

/// Tolerance used when checking that a preference vector sums to one
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Normalized genre affinity derived from a user's ratings.
///
/// Weights are aligned with the genre universe of the index that produced
/// them, are each in `[0, 1]` and sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceVector {
    genres: Vec<String>,
    weights: Vec<f64>,
}

/// One genre's share of the preference vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreWeight {
    pub genre: String,
    pub weight: f64,
}

impl PreferenceVector {
    /// Weight for `genre`, or `None` if it is not part of the universe
    pub fn get(&self, genre: &str) -> Option<f64> {
        self.genres
            .iter()
            .position(|g| g == genre)
            .map(|idx| self.weights[idx])
    }

    /// Weights aligned with the genre universe
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `(genre, weight)` pairs in universe order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.genres
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Genres ordered by descending weight; equal weights keep universe order
    pub fn ranked(&self) -> Vec<GenreWeight> {
        let mut ranked: Vec<GenreWeight> = self
            .iter()
            .map(|(genre, weight)| GenreWeight {
                genre: genre.to_string(),
                weight,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Turns a sparse rating list into a genre preference vector.
///
/// Ratings for titles the index does not know are skipped without error. Each
/// rated title adds its full rating to every genre it carries; the totals are
/// then divided by their grand sum.
pub fn derive_preference(
    ratings: &[RatingEntry],
    index: &GenreIndex,
) -> Result<PreferenceVector, RecommenderError> {
    if ratings.is_empty() {
        return Err(RecommenderError::NoRatingsProvided);
    }

    let universe = index.universe();
    let mut weighted_sum = vec![0.0_f64; universe.len()];
    let mut matched = 0usize;

    for entry in ratings {
        let Some(row) = index.row(&entry.title) else {
            tracing::debug!(title = %entry.title, "Skipping rating for title outside the catalog");
            continue;
        };
        matched += 1;

        let rating = f64::from(entry.rating.value());
        for (sum, &indicator) in weighted_sum.iter_mut().zip(row) {
            *sum += rating * f64::from(indicator);
        }
    }

    if matched == 0 {
        return Err(RecommenderError::NoMatchingRatings);
    }

    let total: f64 = weighted_sum.iter().sum();
    if total == 0.0 {
        return Err(RecommenderError::NoMatchingRatings);
    }

    tracing::debug!(
        supplied = ratings.len(),
        matched,
        total,
        "Preference vector derived"
    );

    Ok(PreferenceVector {
        genres: universe.to_vec(),
        weights: weighted_sum.into_iter().map(|s| s / total).collect(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Catalog, CatalogEntry, Rating};

    pub(crate) fn entry(title: &str, rating: u8) -> RatingEntry {
        RatingEntry::new(title, Rating::new(rating).unwrap())
    }

    pub(crate) fn abc_index() -> GenreIndex {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("A", ["SciFi", "Drama"]),
            CatalogEntry::new("B", ["Comedy"]),
            CatalogEntry::new("C", ["SciFi"]),
        ])
        .unwrap();
        GenreIndex::build(&catalog)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < SUM_TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_weighted_example() {
        let index = abc_index();
        let pref = derive_preference(&[entry("A", 10), entry("B", 2)], &index).unwrap();

        assert_close(pref.get("SciFi").unwrap(), 10.0 / 22.0);
        assert_close(pref.get("Drama").unwrap(), 10.0 / 22.0);
        assert_close(pref.get("Comedy").unwrap(), 2.0 / 22.0);
        assert_close(pref.sum(), 1.0);
    }

    #[test]
    fn test_empty_ratings() {
        let index = abc_index();
        let result = derive_preference(&[], &index);
        assert!(matches!(result, Err(RecommenderError::NoRatingsProvided)));
    }

    #[test]
    fn test_unmatched_ratings_are_dropped() {
        let index = abc_index();

        let result = derive_preference(&[entry("Z", 7), entry("a", 3)], &index);
        assert!(matches!(result, Err(RecommenderError::NoMatchingRatings)));

        let pref = derive_preference(&[entry("Z", 7), entry("C", 3)], &index).unwrap();
        assert_close(pref.get("SciFi").unwrap(), 1.0);
        assert_eq!(pref.get("Comedy"), Some(0.0));
    }

    #[test]
    fn test_genreless_titles_give_no_mass() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Blank", Vec::<String>::new()),
            CatalogEntry::new("B", ["Comedy"]),
        ])
        .unwrap();
        let index = GenreIndex::build(&catalog);

        let result = derive_preference(&[entry("Blank", 9)], &index);
        assert!(matches!(result, Err(RecommenderError::NoMatchingRatings)));
    }

    #[test]
    fn test_sums_to_one_for_many_inputs() {
        let index = GenreIndex::build(&Catalog::builtin());
        let titles = index.titles().to_vec();

        for start in 0..titles.len() {
            for len in 1..=titles.len() - start {
                let ratings: Vec<RatingEntry> = titles[start..start + len]
                    .iter()
                    .enumerate()
                    .map(|(i, t)| entry(t, (i % 10) as u8 + 1))
                    .collect();
                let pref = derive_preference(&ratings, &index).unwrap();
                assert_close(pref.sum(), 1.0);
                assert!(pref.weights().iter().all(|w| (0.0..=1.0).contains(w)));
            }
        }
    }

    #[test]
    fn test_ranked_breaks_ties_by_universe_order() {
        let index = abc_index();
        let pref = derive_preference(&[entry("A", 10), entry("B", 2)], &index).unwrap();
        let ranked = pref.ranked();
        let genres: Vec<&str> = ranked.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(genres, ["Drama", "SciFi", "Comedy"]);
    }
}
