//! Inventory API - HTTP surface over the asset query engine
//!
//! `GET /assets` accepts `id`, `filter`, `maxAssets` and `assetOffset` and
//! returns a paginated `AssetContainer`. `GET /health` answers `ok`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiErrorResponse};
pub use params::AssetQueryParams;
pub use router::{cors_layer, router};
pub use state::AppState;
