use std::{sync::Arc, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::sources::{DatasetSource, LocalFileSource, RemoteSource};

/// Where the dataset artifacts are read from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Local,
    Remote,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset origin: `local` or `remote`
    #[serde(default = "default_data_source")]
    pub data_source: DataSourceKind,

    /// Movie table path for the local source
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Similarity matrix path for the local source
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Movie table URL for the remote source
    pub movies_url: Option<String>,

    /// Similarity matrix URL for the remote source
    pub similarity_url: Option<String>,

    /// Timeout for each remote artifact download, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Load the dataset once before accepting requests
    #[serde(default = "default_load_on_startup")]
    pub load_on_startup: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_source() -> DataSourceKind {
    DataSourceKind::Local
}

fn default_movies_path() -> String {
    "data/movies.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

fn default_load_on_startup() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the dataset source selected by `data_source`
    pub fn dataset_source(&self) -> anyhow::Result<Arc<dyn DatasetSource>> {
        match self.data_source {
            DataSourceKind::Local => Ok(Arc::new(LocalFileSource::new(
                &self.movies_path,
                &self.similarity_path,
            ))),
            DataSourceKind::Remote => {
                let movies_url = self
                    .movies_url
                    .clone()
                    .context("MOVIES_URL must be set when DATA_SOURCE=remote")?;
                let similarity_url = self
                    .similarity_url
                    .clone()
                    .context("SIMILARITY_URL must be set when DATA_SOURCE=remote")?;
                let source = RemoteSource::new(
                    movies_url,
                    similarity_url,
                    Duration::from_secs(self.fetch_timeout_secs),
                )
                .context("Failed to build HTTP client")?;

                Ok(Arc::new(source))
            }
        }
    }
}
