use crate::dataset::DatasetStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: DatasetStore,
}

impl AppState {
    /// Creates application state around a dataset store
    pub fn new(store: DatasetStore) -> Self {
        Self { store }
    }
}
