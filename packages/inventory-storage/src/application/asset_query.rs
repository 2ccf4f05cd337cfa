//! Asset Query UseCase
//!
//! count + rows (one store read) → aggregate + sign. Stateless; every call is an independent
//! read against the store.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::domain::{AssetPage, AssetQuery, AssetStore, StoredPage};
use crate::query::{aggregate, QueryPlanner, SignatureScheme};
use crate::Result;

pub struct AssetQueryService<S: AssetStore + ?Sized> {
    store: Arc<S>,
    planner: QueryPlanner,
    scheme: SignatureScheme,
}

impl<S: AssetStore + ?Sized> Clone for AssetQueryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            planner: self.planner,
            scheme: self.scheme,
        }
    }
}

impl<S: AssetStore + ?Sized> AssetQueryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            planner: QueryPlanner::new(),
            scheme: SignatureScheme::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Run one lookup
    ///
    /// `total_count` counts every asset under the filter, independent of the
    /// page. Errors (including cancellation) abort the whole call.
    #[tracing::instrument(
        skip(self, cancel),
        fields(filter = tracing::field::Empty, total_count = tracing::field::Empty)
    )]
    pub async fn query(&self, query: &AssetQuery, cancel: &CancellationToken) -> Result<AssetPage> {
        let plan = self.planner.plan(query);
        tracing::Span::current().record("filter", plan.filter.as_str());

        let StoredPage { total_count, rows } = self.store.fetch_page(&plan, cancel).await?;
        tracing::Span::current().record("total_count", total_count);

        let assets = aggregate(rows, self.scheme);

        tracing::debug!(returned = assets.len(), "asset query complete");
        Ok(AssetPage {
            assets,
            total_count,
        })
    }
}
