//! Asset Store Port (Trait Interface)
//!
//! Port/Adapter pattern for backend flexibility:
//! - Production: SQLite (the inventory database file)
//! - Testing: InMemory (fast unit tests)

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::models::{AssetRow, StoredPage};
use crate::query::QueryPlan;
use crate::Result;

/// Asset Store Port
///
/// Read-only access to the `assets`/`ips`/`ports` tables. Every call must
/// observe `cancel` and fail with a `Cancelled` error once it fires.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Count assets matching the plan's filter (ignores the page window)
    async fn count_assets(&self, plan: &QueryPlan, cancel: &CancellationToken) -> Result<u64>;

    /// Fetch the flattened join rows for the plan's page, host-ascending
    async fn fetch_rows(
        &self,
        plan: &QueryPlan,
        cancel: &CancellationToken,
    ) -> Result<Vec<AssetRow>>;

    /// Count plus page rows for one lookup
    ///
    /// The count runs first and its failure skips the row query. Backends
    /// with transactions override this to read both from one snapshot.
    async fn fetch_page(&self, plan: &QueryPlan, cancel: &CancellationToken) -> Result<StoredPage> {
        let total_count = self.count_assets(plan, cancel).await?;
        let rows = self.fetch_rows(plan, cancel).await?;
        Ok(StoredPage { total_count, rows })
    }
}
