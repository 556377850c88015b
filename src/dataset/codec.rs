//! Decoding of the two dataset artifacts.
//!
//! The movie table is a JSON array of `{"id", "title", "tags"}` objects in row
//! order. The similarity matrix is a JSON array of equally sized rows, one per
//! movie, in the same order.

use crate::{
    dataset::LoadError,
    models::{Movie, SimilarityMatrix},
};

pub const MOVIES_ARTIFACT: &str = "movie table";
pub const SIMILARITY_ARTIFACT: &str = "similarity matrix";

/// Raw bytes of both artifacts as fetched from a source
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub movies: Vec<u8>,
    pub similarity: Vec<u8>,
}

pub fn decode_movies(bytes: &[u8]) -> Result<Vec<Movie>, LoadError> {
    serde_json::from_slice(bytes).map_err(|e| LoadError::deserialize(MOVIES_ARTIFACT, e))
}

pub fn decode_similarity(bytes: &[u8]) -> Result<SimilarityMatrix, LoadError> {
    serde_json::from_slice(bytes).map_err(|e| LoadError::deserialize(SIMILARITY_ARTIFACT, e))
}
