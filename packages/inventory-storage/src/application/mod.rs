//! Application layer (UseCases)

pub mod asset_query;

pub use asset_query::AssetQueryService;
