use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Errors raised while assembling a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate catalog title: {0}")]
    DuplicateTitle(String),

    #[error("Catalog titles must not be empty")]
    EmptyTitle,

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single title in the catalog together with the genres it is tagged with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    pub genres: Vec<String>,
}

impl CatalogEntry {
    /// Creates an entry, dropping repeated genres while keeping first-seen order
    pub fn new<I, S>(title: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let genres = genres
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| seen.insert(g.clone()))
            .collect();

        Self {
            title: title.into(),
            genres,
        }
    }
}

/// Static, ordered set of titles. Iteration order is the insertion order and
/// is what the scorer falls back on when two titles tie.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty or duplicate titles
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .map(|entry| {
                let genres = entry.genres;
                CatalogEntry::new(entry.title, genres)
            })
            .collect::<Vec<_>>();

        for entry in &entries {
            if entry.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle);
            }
            if !seen.insert(entry.title.as_str()) {
                return Err(CatalogError::DuplicateTitle(entry.title.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The demo catalog the recommender ships with
    pub fn builtin() -> Self {
        let entries = vec![
            CatalogEntry::new("Stranger Things", ["Sci-Fi", "Drama", "Thriller"]),
            CatalogEntry::new("The Office", ["Comedy"]),
            CatalogEntry::new("Breaking Bad", ["Crime", "Drama", "Thriller"]),
            CatalogEntry::new("Interstellar", ["Sci-Fi", "Drama"]),
            CatalogEntry::new("Parks and Rec", ["Comedy"]),
            CatalogEntry::new("The Dark Knight", ["Action", "Crime", "Drama"]),
            CatalogEntry::new("Black Mirror", ["Sci-Fi", "Drama", "Thriller"]),
            CatalogEntry::new("Brooklyn Nine-Nine", ["Comedy", "Crime"]),
            CatalogEntry::new("The Matrix", ["Action", "Sci-Fi"]),
            CatalogEntry::new("Severance", ["Sci-Fi", "Drama", "Thriller"]),
        ];

        Self { entries }
    }

    /// Loads a catalog from a JSON array of `{"title": .., "genres": [..]}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-title lookup
    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    /// Resolves user-typed input to a canonical catalog entry.
    ///
    /// Surrounding whitespace is ignored, inner runs of whitespace collapse to a
    /// single space and the comparison is case-insensitive.
    pub fn resolve(&self, input: &str) -> Option<&CatalogEntry> {
        let wanted = normalize_title(input);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| normalize_title(&e.title) == wanted)
    }
}

fn normalize_title(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
