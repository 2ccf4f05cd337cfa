//! Inventory Domain Models
//!
//! Read-only projections materialized per request:
//! - `Asset` aggregates with owned `Ip`/`Port` children
//! - `AssetRow`: one flattened row of the asset × ips × ports join
//! - `AssetContainer`: paginated response envelope

use serde::{Deserialize, Serialize};

/// Asset ID (primary key of the `assets` table)
pub type AssetId = i64;

/// Asset Entity (aggregate root)
///
/// Field names serialize the way existing clients read them
/// (`ID`, `Host`, `IPs`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "ID")]
    pub id: AssetId,

    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "Comment")]
    pub comment: String,

    #[serde(rename = "Owner")]
    pub owner: String,

    /// Unique by `address`, in first-seen order
    #[serde(rename = "IPs")]
    pub ips: Vec<Ip>,

    /// Unique by `port`, in first-seen order
    #[serde(rename = "Ports")]
    pub ports: Vec<Port>,

    /// SHA256 of the identifying fields (empty until signed)
    #[serde(rename = "Signature")]
    pub signature: String,
}

impl Asset {
    /// Create an unsigned asset with empty child collections
    pub fn new(
        id: AssetId,
        host: impl Into<String>,
        comment: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id,
            host: host.into(),
            comment: comment.into(),
            owner: owner.into(),
            ips: Vec::new(),
            ports: Vec::new(),
            signature: String::new(),
        }
    }
}

/// IP address owned by an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ip {
    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Signature")]
    pub signature: String,
}

impl Ip {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signature: String::new(),
        }
    }
}

/// Network port owned by an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(rename = "Port")]
    pub port: i64,

    #[serde(rename = "Signature")]
    pub signature: String,
}

impl Port {
    pub fn new(port: i64) -> Self {
        Self {
            port,
            signature: String::new(),
        }
    }
}

/// One row of the flattened asset/ip/port join
///
/// `address == ""` and `port == 0` mean "no child on this side of the join".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRow {
    pub id: AssetId,
    pub host: String,
    pub comment: String,
    pub owner: String,
    pub address: String,
    pub port: i64,
}

impl AssetRow {
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    pub fn has_port(&self) -> bool {
        self.port != 0
    }
}

/// Request parameters of an asset lookup
///
/// Empty strings mean "not given". `limit <= 0` or `offset < 0` disables
/// pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub asset_id: String,
    pub host_filter: String,
    pub limit: i64,
    pub offset: i64,
}

impl AssetQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            ..Self::default()
        }
    }

    pub fn by_host(host_filter: impl Into<String>) -> Self {
        Self {
            host_filter: host_filter.into(),
            ..Self::default()
        }
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Pagination is applied only for a positive limit and non-negative offset
    pub fn is_paginated(&self) -> bool {
        window_applies(self.limit, self.offset)
    }
}

fn window_applies(limit: i64, offset: i64) -> bool {
    limit > 0 && offset >= 0
}

/// Raw store output for one lookup: filter-wide count plus the page's join rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub total_count: u64,
    pub rows: Vec<AssetRow>,
}

/// Result of one lookup: the page of assets plus the filter-wide count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub total_count: u64,
}

impl AssetPage {
    /// Wrap the page into the response envelope
    pub fn into_container(self, query: &AssetQuery) -> AssetContainer {
        AssetContainer::new(self.assets, self.total_count, query.limit, query.offset)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetContainer {
    pub assets: Vec<Asset>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl AssetContainer {
    /// Build the envelope from a page and the request's window
    ///
    /// Unless the window applies (positive limit, non-negative offset) the
    /// whole result is one page of `total_count` assets.
    pub fn new(assets: Vec<Asset>, total_count: u64, limit: i64, offset: i64) -> Self {
        if !window_applies(limit, offset) {
            return Self {
                assets,
                page_number: 1,
                page_size: total_count,
                total_pages: 1,
                total_count,
            };
        }

        let page_size = limit as u64;
        let page_number = offset as u64 / page_size + 1;

        Self {
            assets,
            page_number,
            page_size,
            total_pages: total_count.div_ceil(page_size),
            total_count,
        }
    }
}
