//! Query Planner
//!
//! Builds the count statement and the paginated join statement for one
//! asset lookup. Filter values are always bound, never spliced into SQL.

use crate::domain::AssetQuery;

/// A bound statement argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArg {
    Text(String),
    Integer(i64),
}

/// Row filter on the `assets` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFilter {
    /// Full scan
    All,
    /// `id = ?` (exact match)
    IdEquals(String),
    /// `host LIKE '%value%'` (literal substring, case-sensitive)
    HostContains(String),
}

impl AssetFilter {
    /// An asset id takes precedence over a host filter
    pub fn from_params(asset_id: &str, host_filter: &str) -> Self {
        if !asset_id.is_empty() {
            AssetFilter::IdEquals(asset_id.to_string())
        } else if !host_filter.is_empty() {
            AssetFilter::HostContains(host_filter.to_string())
        } else {
            AssetFilter::All
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFilter::All => "all",
            AssetFilter::IdEquals(_) => "id",
            AssetFilter::HostContains(_) => "host",
        }
    }

    fn where_clause(&self) -> &'static str {
        match self {
            AssetFilter::All => "",
            AssetFilter::IdEquals(_) => " WHERE assets.id = ?",
            AssetFilter::HostContains(_) => " WHERE assets.host LIKE ? ESCAPE '\\'",
        }
    }

    fn bound_arg(&self) -> Option<SqlArg> {
        match self {
            AssetFilter::All => None,
            AssetFilter::IdEquals(id) => Some(SqlArg::Text(id.clone())),
            AssetFilter::HostContains(host) => Some(SqlArg::Text(like_pattern(host))),
        }
    }

    /// In-process evaluation with the same semantics as the SQL clause
    pub fn matches(&self, id: i64, host: &str) -> bool {
        match self {
            AssetFilter::All => true,
            AssetFilter::IdEquals(wanted) => id_matches(wanted, id),
            AssetFilter::HostContains(needle) => host.contains(needle.as_str()),
        }
    }
}

/// `assets.id = ?` with a text argument: SQLite applies the column's INTEGER
/// affinity, so any text that reads as a number equal to the id matches
/// (`7`, ` 7 `, `7.0`, `7e0`)
fn id_matches(wanted: &str, id: i64) -> bool {
    let wanted = wanted.trim_matches(|c: char| c.is_ascii_whitespace());
    match wanted.parse::<i64>() {
        Ok(n) => n == id,
        Err(_) => wanted
            .parse::<f64>()
            .is_ok_and(|f| f.is_finite() && f == id as f64),
    }
}

/// `%value%` with LIKE wildcards in `value` escaped
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// LIMIT/OFFSET window over distinct assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

/// Statements and bindings for one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: AssetFilter,
    pub page: Option<PageWindow>,
    pub count_sql: String,
    pub rows_sql: String,
}

impl QueryPlan {
    pub fn count_args(&self) -> Vec<SqlArg> {
        self.filter.bound_arg().into_iter().collect()
    }

    pub fn row_args(&self) -> Vec<SqlArg> {
        let mut args: Vec<SqlArg> = self.filter.bound_arg().into_iter().collect();
        if let Some(page) = self.page {
            args.push(SqlArg::Integer(page.limit));
            args.push(SqlArg::Integer(page.offset));
        }
        args
    }
}

/// Builds `QueryPlan`s; holds no state between calls
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPlanner;

impl QueryPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, query: &AssetQuery) -> QueryPlan {
        let filter = AssetFilter::from_params(&query.asset_id, &query.host_filter);
        let page = query.is_paginated().then_some(PageWindow {
            limit: query.limit,
            offset: query.offset,
        });

        let where_clause = filter.where_clause();
        let count_sql = format!("SELECT COUNT(*) FROM assets{}", where_clause);

        // Pagination bounds the inner asset selection, not the joined rows.
        // id breaks host ties so pages and per-asset row runs are stable.
        let limit_clause = if page.is_some() { " LIMIT ? OFFSET ?" } else { "" };
        let rows_sql = format!(
            "SELECT a.id, a.host, a.comment, a.owner,
                    COALESCE(i.address, ''), COALESCE(p.port, 0)
             FROM (
                 SELECT assets.id AS id,
                        COALESCE(assets.host, '') AS host,
                        COALESCE(assets.comment, '') AS comment,
                        COALESCE(assets.owner, '') AS owner
                 FROM assets{}
                 ORDER BY assets.host ASC, assets.id ASC{}
             ) a
             LEFT JOIN ips i ON a.id = i.asset_id
             LEFT JOIN ports p ON a.id = p.asset_id
             ORDER BY a.host ASC, a.id ASC",
            where_clause, limit_clause
        );

        tracing::debug!(
            filter = filter.as_str(),
            paginated = page.is_some(),
            "planned asset query"
        );

        QueryPlan {
            filter,
            page,
            count_sql,
            rows_sql,
        }
    }
}
