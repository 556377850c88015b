use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    dataset::LoadError,
    models::{Movie, SimilarityMatrix},
};

/// An immutable, row-aligned pairing of the movie table and its similarity matrix
///
/// A snapshot is validated in full on construction and never mutated afterwards;
/// reloads publish a new snapshot instead.
#[derive(Debug)]
pub struct Snapshot {
    movies: Vec<Movie>,
    similarity: SimilarityMatrix,
    /// Title → row index of the first movie carrying that title
    title_index: HashMap<String, usize>,
    version: u64,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        movies: Vec<Movie>,
        similarity: SimilarityMatrix,
        version: u64,
    ) -> Result<Self, LoadError> {
        if movies.len() != similarity.dimension() {
            return Err(LoadError::DimensionMismatch {
                movies: movies.len(),
                matrix: similarity.dimension(),
            });
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(row);
        }

        Ok(Self {
            movies,
            similarity,
            title_index,
            version,
            loaded_at: Utc::now(),
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Row index of the first movie whose title equals `title` exactly
    pub fn row_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All titles in row order
    pub fn titles(&self) -> Vec<String> {
        self.movies.iter().map(|m| m.title.clone()).collect()
    }

    /// Titles containing `query`, ignoring case, in row order
    pub fn search_titles(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .map(|m| m.title.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_new_rejects_dimension_mismatch() {
        let similarity = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let err = Snapshot::new(vec![movie(1, "A"), movie(2, "B")], similarity, 1).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DimensionMismatch {
                movies: 2,
                matrix: 1
            }
        ));
    }

    #[test]
    fn test_row_of_returns_first_match() {
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let snapshot = Snapshot::new(
            vec![movie(1, "Heat"), movie(2, "Up"), movie(3, "Heat")],
            similarity,
            1,
        )
        .unwrap();

        assert_eq!(snapshot.row_of("Heat"), Some(0));
        assert_eq!(snapshot.row_of("Up"), Some(1));
        assert_eq!(snapshot.row_of("heat"), None);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.version(), 1);
    }

    fn catalog() -> Snapshot {
        let titles = ["Batman", "The Dark Knight", "Batman Returns", "Up"];
        let movies: Vec<Movie> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| movie(i as i64 + 1, t))
            .collect();
        let rows = (0..titles.len())
            .map(|i| (0..titles.len()).map(|j| if i == j { 1.0 } else { 0.1 }).collect())
            .collect();
        Snapshot::new(movies, SimilarityMatrix::from_rows(rows).unwrap(), 1).unwrap()
    }

    #[test]
    fn test_titles_in_row_order() {
        assert_eq!(
            catalog().titles(),
            vec!["Batman", "The Dark Knight", "Batman Returns", "Up"]
        );
    }

    #[test]
    fn test_search_titles_case_insensitive_substring() {
        let snapshot = catalog();
        assert_eq!(snapshot.search_titles("bat"), vec!["Batman", "Batman Returns"]);
        assert_eq!(snapshot.search_titles("KNIGHT"), vec!["The Dark Knight"]);
    }

    #[test]
    fn test_search_titles_empty_query_matches_all() {
        let snapshot = catalog();
        assert_eq!(snapshot.search_titles(""), snapshot.titles());
    }

    #[test]
    fn test_search_titles_no_match_is_empty() {
        assert!(catalog().search_titles("zzz").is_empty());
    }
}
