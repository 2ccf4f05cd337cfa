//! Query-and-aggregation engine
//!
//! ```text
//! AssetQuery ──► planner ──► QueryPlan ──► (AssetStore) ──► Vec<AssetRow>
//!                                                              │
//!                     Vec<Asset> (signed) ◄── aggregator ◄─────┘
//! ```

pub mod aggregator;
pub mod planner;
pub mod signature;

pub use aggregator::{aggregate, ResultAggregator};
pub use planner::{AssetFilter, PageWindow, QueryPlan, QueryPlanner, SqlArg};
pub use signature::{asset_signature, ip_signature, port_signature, sign_asset, SignatureScheme};
