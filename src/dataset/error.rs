/// Errors raised while fetching, decoding or validating a dataset
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The source could not be read (IO failure, network failure, bad HTTP status)
    #[error("failed to fetch {artifact} from {location}: {reason}")]
    Fetch {
        artifact: &'static str,
        location: String,
        reason: String,
    },

    /// The artifact bytes are not a valid encoding of the expected schema
    #[error("failed to decode {artifact}: {reason}")]
    Deserialize {
        artifact: &'static str,
        reason: String,
    },

    /// Movie table and similarity matrix disagree on the number of rows
    #[error("dataset has {movies} movies but similarity matrix is {matrix}x{matrix}")]
    DimensionMismatch { movies: usize, matrix: usize },

    /// The blocking decode task panicked or was cancelled
    #[error("dataset decode task failed: {0}")]
    Task(String),
}

impl LoadError {
    pub fn fetch(
        artifact: &'static str,
        location: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        LoadError::Fetch {
            artifact,
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn deserialize(artifact: &'static str, reason: impl ToString) -> Self {
        LoadError::Deserialize {
            artifact,
            reason: reason.to_string(),
        }
    }
}
