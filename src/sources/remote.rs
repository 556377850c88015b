use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::dataset::{
    codec::{MOVIES_ARTIFACT, SIMILARITY_ARTIFACT},
    LoadError, RawDataset,
};

use super::DatasetSource;

/// Fetches both artifacts over plain HTTP GET, e.g. from a public object-storage bucket
#[derive(Clone)]
pub struct RemoteSource {
    http_client: HttpClient,
    movies_url: String,
    similarity_url: String,
}

impl RemoteSource {
    /// Creates a remote source whose requests give up after `timeout`
    pub fn new(
        movies_url: impl Into<String>,
        similarity_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            movies_url: movies_url.into(),
            similarity_url: similarity_url.into(),
        })
    }

    async fn download(&self, artifact: &'static str, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::fetch(artifact, url, e))?;

        if !response.status().is_success() {
            return Err(LoadError::fetch(
                artifact,
                url,
                format!("server returned status {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::fetch(artifact, url, e))?;

        tracing::debug!(url = %url, bytes = body.len(), "Downloaded {}", artifact);

        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl DatasetSource for RemoteSource {
    async fn fetch(&self) -> Result<RawDataset, LoadError> {
        let (movies, similarity) = tokio::try_join!(
            self.download(MOVIES_ARTIFACT, &self.movies_url),
            self.download(SIMILARITY_ARTIFACT, &self.similarity_url),
        )?;

        Ok(RawDataset { movies, similarity })
    }

    fn describe(&self) -> String {
        format!("remote urls {} and {}", self.movies_url, self.similarity_url)
    }
}
