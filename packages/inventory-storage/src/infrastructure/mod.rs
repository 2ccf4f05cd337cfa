//! Infrastructure layer - Storage adapters
//!
//! Multiple backends for the AssetStore trait

pub mod memory_store;
pub use memory_store::InMemoryAssetStore;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteAssetStore;
