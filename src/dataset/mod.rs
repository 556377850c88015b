pub mod codec;
mod error;
mod snapshot;
mod store;

pub use codec::RawDataset;
pub use error::LoadError;
pub use snapshot::Snapshot;
pub use store::DatasetStore;
