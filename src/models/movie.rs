use serde::{Deserialize, Serialize};

/// A row of the movie metadata table
///
/// The movie's position in the table is its row index into the similarity matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub tags: String,
}

/// A movie returned by the recommendation engine, with its raw similarity score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMovie {
    pub id: i64,
    pub title: String,
    pub tags: String,
    pub similarity_score: f64,
}

impl RecommendedMovie {
    pub fn new(movie: &Movie, similarity_score: f64) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            tags: movie.tags.clone(),
            similarity_score,
        }
    }
}
