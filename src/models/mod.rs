mod catalog;
mod profile;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use profile::{
    normalize_username, Profile, Rating, RatingEntry, RatingError, UsernameError, MAX_RATING,
    MIN_RATING,
};
