use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::{
    dataset::{
        codec::{decode_movies, decode_similarity},
        LoadError, RawDataset, Snapshot,
    },
    error::{AppError, AppResult},
    sources::DatasetSource,
};

/// Owner of the dataset snapshot currently in effect
///
/// Readers clone the current `Arc<Snapshot>` and work against it without holding
/// any lock. A load fetches and validates a complete snapshot first and only then
/// swaps the pointer, so a request sees either the old or the new dataset in full.
#[derive(Clone)]
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    current: Arc<RwLock<Option<Arc<Snapshot>>>>,
    /// Serializes loads so versions are published in order
    load_lock: Arc<Mutex<()>>,
}

impl DatasetStore {
    /// Creates an empty store backed by `source`
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            current: Arc::new(RwLock::new(None)),
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads from the store's configured source and publishes the result
    pub async fn load(&self) -> Result<Arc<Snapshot>, LoadError> {
        self.load_from(self.source.as_ref()).await
    }

    /// Fetches, decodes and validates a dataset from `source`, then publishes it
    ///
    /// On failure the previously published snapshot, if any, stays in effect.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn load_from(
        &self,
        source: &dyn DatasetSource,
    ) -> Result<Arc<Snapshot>, LoadError> {
        let _guard = self.load_lock.lock().await;

        let result = Self::build_snapshot(source, self.next_version().await).await;

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.current.write().await = Some(snapshot.clone());

                tracing::info!(
                    movies = snapshot.len(),
                    version = snapshot.version(),
                    loaded_at = %snapshot.loaded_at(),
                    "Dataset loaded"
                );

                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "Dataset load failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Fetches on the async runtime, then decodes on the blocking pool
    async fn build_snapshot(
        source: &dyn DatasetSource,
        version: u64,
    ) -> Result<Snapshot, LoadError> {
        let raw = source.fetch().await?;

        tokio::task::spawn_blocking(move || Self::decode(raw, version))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))?
    }

    fn decode(raw: RawDataset, version: u64) -> Result<Snapshot, LoadError> {
        let movies = decode_movies(&raw.movies)?;
        let similarity = decode_similarity(&raw.similarity)?;
        Snapshot::new(movies, similarity, version)
    }

    async fn next_version(&self) -> u64 {
        self.current
            .read()
            .await
            .as_ref()
            .map_or(1, |snapshot| snapshot.version() + 1)
    }

    /// Returns the latest published snapshot
    pub async fn current(&self) -> AppResult<Arc<Snapshot>> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(AppError::DataNotLoaded)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// All titles of the current snapshot in row order
    pub async fn list_titles(&self) -> AppResult<Vec<String>> {
        Ok(self.current().await?.titles())
    }

    /// Titles of the current snapshot containing `query`, ignoring case
    pub async fn search_titles(&self, query: &str) -> AppResult<Vec<String>> {
        Ok(self.current().await?.search_titles(query))
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockDatasetSource;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};
    use tokio_test::{assert_err, assert_ok};

    fn raw(movies: &str, similarity: &str) -> RawDataset {
        RawDataset {
            movies: movies.as_bytes().to_vec(),
            similarity: similarity.as_bytes().to_vec(),
        }
    }

    const THREE_MOVIES: &str = r#"[
        {"id": 1, "title": "A", "tags": "a"},
        {"id": 2, "title": "B", "tags": "b"},
        {"id": 3, "title": "C", "tags": "c"}
    ]"#;
    const THREE_BY_THREE: &str = "[[1.0, 0.5, 0.9], [0.5, 1.0, 0.2], [0.9, 0.2, 1.0]]";
    const TWO_BY_TWO: &str = "[[1.0, 0.5], [0.5, 1.0]]";

    fn source_returning(results: Vec<Result<RawDataset, LoadError>>) -> MockDatasetSource {
        let mut source = MockDatasetSource::new();
        let mut results = results.into_iter();
        source
            .expect_fetch()
            .returning(move || results.next().expect("unexpected fetch"));
        source
            .expect_describe()
            .returning(|| "mock source".to_string());
        source
    }

    #[tokio::test]
    async fn test_current_before_load_is_not_loaded() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![])));

        assert!(!store.is_loaded().await);
        assert!(matches!(store.current().await, Err(AppError::DataNotLoaded)));
        assert!(matches!(store.list_titles().await, Err(AppError::DataNotLoaded)));
        assert!(matches!(
            store.search_titles("a").await,
            Err(AppError::DataNotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_load_publishes_snapshot() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![Ok(raw(
            THREE_MOVIES,
            THREE_BY_THREE,
        ))])));

        let snapshot = assert_ok!(store.load().await);

        assert_eq!(snapshot.version(), 1);
        assert!(store.is_loaded().await);
        assert_eq!(store.list_titles().await.unwrap(), vec!["A", "B", "C"]);
        assert_eq!(store.search_titles("b").await.unwrap(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_load_dimension_mismatch() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![Ok(raw(
            THREE_MOVIES,
            TWO_BY_TWO,
        ))])));

        let err = assert_err!(store.load().await);

        assert!(matches!(
            err,
            LoadError::DimensionMismatch {
                movies: 3,
                matrix: 2
            }
        ));
        assert!(!store.is_loaded().await);
    }

    #[tokio::test]
    async fn test_load_malformed_blob() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![Ok(raw(
            "not json",
            THREE_BY_THREE,
        ))])));

        let err = assert_err!(store.load().await);
        assert!(matches!(err, LoadError::Deserialize { .. }));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![
            Ok(raw(THREE_MOVIES, THREE_BY_THREE)),
            Err(LoadError::fetch("movie table", "mock", "connection reset")),
            Ok(raw(THREE_MOVIES, TWO_BY_TWO)),
        ])));

        assert_ok!(store.load().await);
        assert_err!(store.load().await);
        assert_err!(store.load().await);

        let snapshot = store.current().await.unwrap();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.len(), 3);
    }

    #[tokio::test]
    async fn test_reload_increments_version() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![
            Ok(raw(THREE_MOVIES, THREE_BY_THREE)),
            Ok(raw(r#"[{"id": 9, "title": "Z"}]"#, "[[1.0]]")),
        ])));

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();

        assert_eq!(second.version(), 2);
        // Readers holding the old snapshot keep a consistent view
        assert_eq!(first.len(), 3);
        assert_eq!(first.similarity().dimension(), 3);
        assert_eq!(store.list_titles().await.unwrap(), vec!["Z"]);
    }

    #[tokio::test]
    async fn test_load_from_explicit_source() {
        let store = DatasetStore::new(Arc::new(source_returning(vec![])));
        let other = source_returning(vec![Ok(raw(THREE_MOVIES, THREE_BY_THREE))]);

        assert_ok!(store.load_from(&other).await);
        assert_eq!(store.current().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_reads_during_reloads_never_tear() {
        let datasets: Vec<_> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    Ok(raw(THREE_MOVIES, THREE_BY_THREE))
                } else {
                    Ok(raw(r#"[{"id": 9, "title": "Z"}]"#, "[[1.0]]"))
                }
            })
            .collect();
        let store = DatasetStore::new(Arc::new(source_returning(datasets)));
        store.load().await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..19 {
                    store.load().await.unwrap();
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let snapshot = store.current().await.unwrap();
                    assert_eq!(snapshot.len(), snapshot.similarity().dimension());
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(store.current().await.unwrap().version(), 20);
    }

    fn large_dataset(n: usize) -> RawDataset {
        let movies: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"id": {}, "title": "Movie {}", "tags": ""}}"#, i, i))
            .collect();
        let rows: Vec<String> = (0..n)
            .map(|i| {
                let scores: Vec<String> = (0..n)
                    .map(|j| {
                        if i == j {
                            "1.0".to_string()
                        } else {
                            format!("0.{:04}", (i * 31 + j * 17) % 10000)
                        }
                    })
                    .collect();
                format!("[{}]", scores.join(","))
            })
            .collect();
        raw(&format!("[{}]", movies.join(",")), &format!("[{}]", rows.join(",")))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_load_does_not_stall_the_worker() {
        let source = source_returning(vec![Ok(large_dataset(1200))]);
        let store = DatasetStore::new(Arc::new(source));
        let done = Arc::new(AtomicBool::new(false));

        // Both tasks share the single worker thread
        let ticker = {
            let done = done.clone();
            tokio::spawn(async move {
                let mut max_gap = Duration::ZERO;
                let mut last = Instant::now();
                while !done.load(Ordering::SeqCst) {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    let now = Instant::now();
                    max_gap = max_gap.max(now - last);
                    last = now;
                }
                max_gap
            })
        };
        let loader = {
            let store = store.clone();
            let done = done.clone();
            tokio::spawn(async move {
                let result = store.load().await;
                done.store(true, Ordering::SeqCst);
                result
            })
        };

        let snapshot = loader.await.unwrap().unwrap();
        let max_gap = ticker.await.unwrap();

        assert_eq!(snapshot.len(), 1200);
        assert!(
            max_gap < Duration::from_millis(100),
            "worker stalled for {:?} during load",
            max_gap
        );
    }
}
