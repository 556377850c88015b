mod movie;
mod similarity;

pub use movie::{Movie, RecommendedMovie};
pub use similarity::{MatrixError, SimilarityMatrix};
