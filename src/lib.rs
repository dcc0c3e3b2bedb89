//! Content-based title recommendations from a user's genre preferences.
//!
//! A static [`models::Catalog`] is indexed once into a genre indicator matrix
//! ([`services::GenreIndex`]). Each recommendation run derives a normalized
//! genre preference vector from the user's ratings, scores every unrated
//! title against it and explains the top results by their strongest genres.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
