//! In-Memory Asset Store (for testing)
//!
//! Evaluates a `QueryPlan`'s filter and page window in process and emits the
//! same flattened rows the SQL join would. Contents are fixed once built.
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::domain::{AssetId, AssetRow, AssetStore};
use crate::query::QueryPlan;
use crate::{QueryError, Result};

#[derive(Debug, Clone)]
struct AssetRecord {
    host: String,
    comment: String,
    owner: String,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetStore {
    assets: BTreeMap<AssetId, AssetRecord>,
    ips: Vec<(AssetId, String)>,
    ports: Vec<(AssetId, i64)>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(
        mut self,
        id: AssetId,
        host: impl Into<String>,
        comment: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        self.assets.insert(
            id,
            AssetRecord {
                host: host.into(),
                comment: comment.into(),
                owner: owner.into(),
            },
        );
        self
    }

    pub fn with_ip(mut self, asset_id: AssetId, address: impl Into<String>) -> Self {
        self.ips.push((asset_id, address.into()));
        self
    }

    pub fn with_port(mut self, asset_id: AssetId, port: i64) -> Self {
        self.ports.push((asset_id, port));
        self
    }

    /// Matching assets, host-ascending (id breaks ties)
    fn matching(&self, plan: &QueryPlan) -> Vec<(AssetId, &AssetRecord)> {
        let mut matching: Vec<_> = self
            .assets
            .iter()
            .filter(|(id, record)| plan.filter.matches(**id, &record.host))
            .map(|(id, record)| (*id, record))
            .collect();
        matching.sort_by(|a, b| a.1.host.cmp(&b.1.host).then(a.0.cmp(&b.0)));
        matching
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn count_assets(&self, plan: &QueryPlan, cancel: &CancellationToken) -> Result<u64> {
        if cancel.is_cancelled() {
            return Err(QueryError::cancelled("asset count"));
        }
        Ok(self.matching(plan).len() as u64)
    }

    async fn fetch_rows(
        &self,
        plan: &QueryPlan,
        cancel: &CancellationToken,
    ) -> Result<Vec<AssetRow>> {
        let matching = self.matching(plan);
        let (skip, take) = match plan.page {
            Some(page) => (page.offset as usize, page.limit as usize),
            None => (0, usize::MAX),
        };

        let mut rows = Vec::new();
        for (id, record) in matching.into_iter().skip(skip).take(take) {
            if cancel.is_cancelled() {
                return Err(QueryError::cancelled("asset rows"));
            }

            let mut addresses: Vec<&str> = self
                .ips
                .iter()
                .filter(|(owner, _)| *owner == id)
                .map(|(_, address)| address.as_str())
                .collect();
            if addresses.is_empty() {
                addresses.push("");
            }
            let mut ports: Vec<i64> = self
                .ports
                .iter()
                .filter(|(owner, _)| *owner == id)
                .map(|(_, port)| *port)
                .collect();
            if ports.is_empty() {
                ports.push(0);
            }

            for address in &addresses {
                for port in &ports {
                    rows.push(AssetRow {
                        id,
                        host: record.host.clone(),
                        comment: record.comment.clone(),
                        owner: record.owner.clone(),
                        address: address.to_string(),
                        port: *port,
                    });
                }
            }
        }
        Ok(rows)
    }
}
