//! Inventory Domain Layer
//!
//! Entities are read-only projections of the `assets`, `ips` and `ports`
//! tables. The `AssetStore` port is the only way the engine reaches storage.

pub mod models;
pub mod ports;

pub use models::{
    Asset, AssetContainer, AssetId, AssetPage, AssetQuery, AssetRow, Ip, Port, StoredPage,
};
pub use ports::AssetStore;
