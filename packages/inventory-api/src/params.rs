//! `GET /assets` query-string parameters

use serde::Deserialize;

use inventory_storage::{AssetQuery, QueryError, Result};

/// Raw query-string values. Empty strings count as not given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetQueryParams {
    pub id: Option<String>,
    pub filter: Option<String>,
    #[serde(rename = "maxAssets")]
    pub max_assets: Option<String>,
    #[serde(rename = "assetOffset")]
    pub asset_offset: Option<String>,
}

impl AssetQueryParams {
    pub fn into_query(self) -> Result<AssetQuery> {
        let limit = parse_integer("maxAssets", self.max_assets.as_deref())?;
        let offset = parse_integer("assetOffset", self.asset_offset.as_deref())?;
        Ok(AssetQuery {
            asset_id: self.id.unwrap_or_default(),
            host_filter: self.filter.unwrap_or_default(),
            limit,
            offset,
        })
    }
}

fn parse_integer(name: &str, raw: Option<&str>) -> Result<i64> {
    match raw {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| QueryError::invalid_parameter(name, value)),
    }
}
