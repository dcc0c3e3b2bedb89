use std::collections::{BTreeSet, HashMap};

use crate::models::Catalog;

/// Dense title x genre indicator matrix derived from a catalog.
///
/// Rows follow catalog order and columns follow the genre universe, which is
/// sorted lexicographically (byte order, case-sensitive). Both orders are
/// stable across runs and drive every tie-break downstream.
#[derive(Debug, Clone)]
pub struct GenreIndex {
    universe: Vec<String>,
    titles: Vec<String>,
    rows: Vec<Vec<u8>>,
    positions: HashMap<String, usize>,
}

impl GenreIndex {
    /// Builds the genre universe and indicator matrix for `catalog`
    pub fn build(catalog: &Catalog) -> Self {
        let universe: Vec<String> = catalog
            .entries()
            .iter()
            .flat_map(|e| e.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: HashMap<&str, usize> = universe
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();

        let mut titles = Vec::with_capacity(catalog.len());
        let mut rows = Vec::with_capacity(catalog.len());
        let mut positions = HashMap::with_capacity(catalog.len());

        for (row_idx, entry) in catalog.entries().iter().enumerate() {
            let mut row = vec![0u8; universe.len()];
            for genre in &entry.genres {
                if let Some(&col) = columns.get(genre.as_str()) {
                    row[col] = 1;
                }
            }
            positions.insert(entry.title.clone(), row_idx);
            titles.push(entry.title.clone());
            rows.push(row);
        }

        tracing::debug!(
            titles = titles.len(),
            genres = universe.len(),
            "Genre index built"
        );

        Self {
            universe,
            titles,
            rows,
            positions,
        }
    }

    /// Sorted, duplicate-free list of every genre in the catalog
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Catalog titles in catalog order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Indicator row for `title`, aligned with [`GenreIndex::universe`]
    pub fn row(&self, title: &str) -> Option<&[u8]> {
        self.positions
            .get(title)
            .map(|&idx| self.rows[idx].as_slice())
    }

    /// Single matrix cell; `None` when either the title or the genre is unknown
    pub fn indicator(&self, title: &str, genre: &str) -> Option<u8> {
        let row = self.row(title)?;
        let col = self.universe.binary_search_by(|g| g.as_str().cmp(genre)).ok()?;
        Some(row[col])
    }

    /// Rows paired with their titles, in catalog order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.titles
            .iter()
            .zip(self.rows.iter())
            .map(|(t, r)| (t.as_str(), r.as_slice()))
    }
}
