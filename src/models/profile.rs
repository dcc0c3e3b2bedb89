use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("Rating must be between 1 and 10, got {0}")]
    OutOfRange(i64),
}

/// A user's score for a title, always within `MIN_RATING..=MAX_RATING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(i64::from(value)))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| RatingError::OutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rated title. The title is expected to already be the canonical catalog
/// spelling; resolution happens before entries are built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingEntry {
    pub title: String,
    pub rating: Rating,
}

impl RatingEntry {
    pub fn new(title: impl Into<String>, rating: Rating) -> Self {
        Self {
            title: title.into(),
            rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
    #[error("Username may only contain letters, digits, '-' and '_': {0}")]
    InvalidCharacters(String),
}

/// Trims and lowercases a username, rejecting anything unsafe to use as a file stem
pub fn normalize_username(raw: &str) -> Result<String, UsernameError> {
    let username = raw.trim().to_lowercase();
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(UsernameError::InvalidCharacters(username));
    }
    Ok(username)
}

/// A single user's rating history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
}

impl Profile {
    /// Creates an empty profile for an already-normalized username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ratings: Vec::new(),
        }
    }

    /// Adds a rating, or overwrites the existing one so a title is never listed twice
    pub fn add_rating(&mut self, title: impl Into<String>, rating: Rating) {
        let title = title.into();
        if let Some(existing) = self.ratings.iter_mut().find(|r| r.title == title) {
            existing.rating = rating;
        } else {
            self.ratings.push(RatingEntry { title, rating });
        }
    }

    /// Removes a title's rating, returning it if it was present
    pub fn remove_rating(&mut self, title: &str) -> Option<RatingEntry> {
        let position = self.ratings.iter().position(|r| r.title == title)?;
        Some(self.ratings.remove(position))
    }

    /// Replaces the rating of an already-rated title and returns the previous value
    pub fn change_rating(&mut self, title: &str, rating: Rating) -> Option<Rating> {
        let entry = self.ratings.iter_mut().find(|r| r.title == title)?;
        Some(std::mem::replace(&mut entry.rating, rating))
    }

    pub fn rating_for(&self, title: &str) -> Option<Rating> {
        self.ratings
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.rating)
    }

    pub fn rated_titles(&self) -> HashSet<&str> {
        self.ratings.iter().map(|r| r.title.as_str()).collect()
    }
}
