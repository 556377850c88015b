//! Origins of the raw dataset artifacts.
//!
//! A source only fetches bytes; decoding and validation happen in the dataset
//! store so that every source reports the same error taxonomy.

use crate::dataset::{LoadError, RawDataset};

pub mod local;
pub mod remote;

pub use local::LocalFileSource;
pub use remote::RemoteSource;

/// Trait for dataset sources
///
/// Implementations fetch both artifacts together; a failure on either one fails the
/// whole fetch so the store never pairs artifacts from different origins.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the raw bytes of the movie table and the similarity matrix
    async fn fetch(&self) -> Result<RawDataset, LoadError>;

    /// Human-readable location for logging
    fn describe(&self) -> String;
}
