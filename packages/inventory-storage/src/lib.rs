//! Inventory Storage - asset query-and-aggregation engine
//!
//! > "Flat join rows in, signed asset trees out, in the order the query asked for."
//!
//! ## Core Principles
//!
//! 1. **Read-only**: the engine never writes, creates or migrates tables
//! 2. **Bound parameters only**: filter values never reach SQL text
//! 3. **Count follows the filter**: `total_count` ignores the page window
//! 4. **Stable order**: assets come back in first-seen (host-ascending) order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_storage::{AssetQuery, AssetQueryService, SqliteAssetStore, StorageConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = StorageConfig::default();
//! let store = SqliteAssetStore::open("assets.db", &config)?;
//! let service = AssetQueryService::new(Arc::new(store)).with_scheme(config.signature_scheme);
//!
//! let query = AssetQuery::by_host("example.org").paginate(10, 0);
//! let page = service.query(&query, &CancellationToken::new()).await?;
//! let container = page.into_container(&query);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod query;

pub use error::{ErrorKind, QueryError, Result};

pub use application::AssetQueryService;
pub use config::StorageConfig;
pub use domain::{
    Asset, AssetContainer, AssetId, AssetPage, AssetQuery, AssetRow, AssetStore, Ip, Port,
    StoredPage,
};
pub use infrastructure::InMemoryAssetStore;
#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteAssetStore;
pub use query::{QueryPlan, QueryPlanner, ResultAggregator, SignatureScheme};
