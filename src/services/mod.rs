pub mod explainer;
pub mod genre_index;
pub mod preference;
pub mod profiles;
pub mod recommendations;
pub mod scorer;

pub use explainer::{explain, Explanation, GenreContribution, DEFAULT_TOP_K};
pub use genre_index::GenreIndex;
pub use preference::{derive_preference, GenreWeight, PreferenceVector};
pub use profiles::{InMemoryStore, JsonFileStore, ProfileStore};
pub use recommendations::{
    RecommendOptions, Recommendation, Recommendations, Recommender, RecommenderError,
    DEFAULT_TOP_N,
};
pub use scorer::{score_titles, ScoredTitle};
