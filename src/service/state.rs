//! Server state management for the statistics service

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{LayerRegistry, ServiceConfig};
use crate::raster::RasterSet;
use crate::sampling::CancelToken;
use crate::stats::ComputeOptions;

/// Configuration and rasters loaded by the last `Load` request.
///
/// Both are behind `Arc` so statistics jobs can run on worker threads while
/// the request loop keeps serving.
pub struct ServerState {
    pub config_path: Option<PathBuf>,
    pub config: Arc<ServiceConfig>,
    pub rasters: Arc<RasterSet>,
    /// Handed to every job; swapped for a fresh token on `Cancel`
    pub cancel: CancelToken,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: Arc::new(ServiceConfig::default()),
            rasters: Arc::new(RasterSet::new()),
            cancel: CancelToken::new(),
        }
    }

    /// Install a freshly loaded configuration
    pub fn install(&mut self, path: PathBuf, config: ServiceConfig, rasters: RasterSet) {
        self.config_path = Some(path);
        self.config = Arc::new(config);
        self.rasters = Arc::new(rasters);
    }

    /// Drop everything loaded so far
    pub fn clear(&mut self) {
        self.config_path = None;
        self.config = Arc::new(ServiceConfig::default());
        self.rasters = Arc::new(RasterSet::new());
    }

    /// Cancel every job started so far; later jobs get a new token
    pub fn cancel_running(&mut self) {
        self.cancel.cancel();
        self.cancel = CancelToken::new();
    }

    /// Check if a configuration is loaded
    pub fn is_config_loaded(&self) -> bool {
        self.config_path.is_some()
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.config.layers
    }

    pub fn compute_options(&self) -> ComputeOptions {
        ComputeOptions {
            max_area: self.config.max_area,
            cancel: self.cancel.clone(),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
