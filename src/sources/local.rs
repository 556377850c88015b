use std::path::{Path, PathBuf};

use crate::dataset::{
    codec::{MOVIES_ARTIFACT, SIMILARITY_ARTIFACT},
    LoadError, RawDataset,
};

use super::DatasetSource;

/// Reads both artifacts from the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    movies_path: PathBuf,
    similarity_path: PathBuf,
}

impl LocalFileSource {
    pub fn new(movies_path: impl Into<PathBuf>, similarity_path: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            similarity_path: similarity_path.into(),
        }
    }

    async fn read(artifact: &'static str, path: &Path) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| LoadError::fetch(artifact, path.display().to_string(), e))
    }
}

#[async_trait::async_trait]
impl DatasetSource for LocalFileSource {
    async fn fetch(&self) -> Result<RawDataset, LoadError> {
        let (movies, similarity) = tokio::try_join!(
            Self::read(MOVIES_ARTIFACT, &self.movies_path),
            Self::read(SIMILARITY_ARTIFACT, &self.similarity_path),
        )?;

        tracing::debug!(
            movies_bytes = movies.len(),
            similarity_bytes = similarity.len(),
            "Read dataset artifacts from disk"
        );

        Ok(RawDataset { movies, similarity })
    }

    fn describe(&self) -> String {
        format!(
            "local files {} and {}",
            self.movies_path.display(),
            self.similarity_path.display()
        )
    }
}
