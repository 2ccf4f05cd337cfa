//! Result Aggregator
//!
//! Folds the flattened asset × ips × ports join back into `Asset` trees.
//! The join repeats every address once per port (and vice versa), so child
//! collections are deduplicated while folding. Assets come out in the order
//! their id was first seen in the row stream.

use rustc_hash::{FxHashMap, FxHashSet};

use super::signature::{sign_asset, SignatureScheme};
use crate::domain::{Asset, AssetId, AssetRow, Ip, Port};

/// Asset under construction plus the children it already holds
struct AssetBuilder {
    asset: Asset,
    seen_addresses: FxHashSet<String>,
    seen_ports: FxHashSet<i64>,
}

impl AssetBuilder {
    fn from_row(row: &AssetRow) -> Self {
        Self {
            asset: Asset::new(row.id, &row.host, &row.comment, &row.owner),
            seen_addresses: FxHashSet::default(),
            seen_ports: FxHashSet::default(),
        }
    }

    fn absorb(&mut self, row: AssetRow) {
        if row.has_port() && self.seen_ports.insert(row.port) {
            self.asset.ports.push(Port::new(row.port));
        }
        if row.has_address() && !self.seen_addresses.contains(&row.address) {
            self.seen_addresses.insert(row.address.clone());
            self.asset.ips.push(Ip::new(row.address));
        }
    }
}

/// Order-preserving fold of join rows into assets
pub struct ResultAggregator {
    scheme: SignatureScheme,
    builders: Vec<AssetBuilder>,
    // asset id -> position in `builders`
    index: FxHashMap<AssetId, usize>,
    rows_seen: usize,
}

impl ResultAggregator {
    pub fn new(scheme: SignatureScheme) -> Self {
        Self {
            scheme,
            builders: Vec::new(),
            index: FxHashMap::default(),
            rows_seen: 0,
        }
    }

    pub fn push(&mut self, row: AssetRow) {
        self.rows_seen += 1;
        let position = match self.index.get(&row.id) {
            Some(&position) => position,
            None => {
                let position = self.builders.len();
                self.builders.push(AssetBuilder::from_row(&row));
                self.index.insert(row.id, position);
                position
            }
        };
        self.builders[position].absorb(row);
    }

    /// Sign every asset and return them in first-seen order
    pub fn finish(self) -> Vec<Asset> {
        tracing::debug!(
            rows = self.rows_seen,
            assets = self.builders.len(),
            "aggregated asset rows"
        );

        let scheme = self.scheme;
        self.builders
            .into_iter()
            .map(|builder| {
                let mut asset = builder.asset;
                sign_asset(&mut asset, scheme);
                asset
            })
            .collect()
    }
}

/// Fold a complete row stream into signed assets
pub fn aggregate<I>(rows: I, scheme: SignatureScheme) -> Vec<Asset>
where
    I: IntoIterator<Item = AssetRow>,
{
    let mut aggregator = ResultAggregator::new(scheme);
    for row in rows {
        aggregator.push(row);
    }
    aggregator.finish()
}
