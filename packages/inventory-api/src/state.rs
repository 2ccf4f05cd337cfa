use std::sync::Arc;
use std::time::Duration;

use inventory_storage::{AssetQueryService, AssetStore, SignatureScheme};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: AssetQueryService<dyn AssetStore>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AssetStore>,
        scheme: SignatureScheme,
        request_timeout: Duration,
    ) -> Self {
        Self {
            service: AssetQueryService::new(store).with_scheme(scheme),
            request_timeout,
        }
    }
}
