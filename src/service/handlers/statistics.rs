//! Statistics handlers: ComputeStatistics, Cancel
//!
//! `ComputeStatistics` is split into a cheap preparation step, run on the
//! request loop, and a [`StatisticsJob`] that does the sampling and may be
//! moved to a worker thread.

use geo::MultiPolygon;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::config::ServiceConfig;
use crate::geometry::area_from_json_value;
use crate::raster::RasterSet;
use crate::service::protocol::{error_codes, Response};
use crate::service::state::ServerState;
use crate::stats::{compute_statistics, ComputeOptions};

/// A validated statistics request, ready to run
pub struct StatisticsJob {
    pub id: Option<serde_json::Value>,
    area: MultiPolygon<f64>,
    layers: Option<Vec<String>>,
    config: Arc<ServiceConfig>,
    rasters: Arc<RasterSet>,
    options: ComputeOptions,
}

impl StatisticsJob {
    /// Sample and reduce every requested layer
    pub fn run(self) -> Response {
        let result = compute_statistics(
            &self.area,
            self.layers.as_deref(),
            &self.config.layers,
            self.rasters.as_ref(),
            &self.options,
        );

        match result {
            Ok(report) => match serde_json::to_value(&report) {
                Ok(value) => Response::success(self.id, value),
                Err(e) => Response::error(self.id, error_codes::INTERNAL_ERROR, e.to_string()),
            },
            Err(e) => {
                warn!(error = %e, "statistics request failed");
                Response::from_statistics_error(self.id, &e)
            }
        }
    }
}

/// Parse and validate a ComputeStatistics request without sampling anything
pub fn prepare_statistics_job(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Result<StatisticsJob, Response> {
    #[derive(Deserialize)]
    struct StatisticsParams {
        feature: serde_json::Value,
        #[serde(default)]
        layers: Option<LayerList>,
    }

    // The web client sends `layers` as a JSON-encoded string
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LayerList {
        Ids(Vec<String>),
        Encoded(String),
    }

    let params: StatisticsParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Err(Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params: expected {feature: GeoJSON, layers?: string[]}".to_string(),
            ));
        }
    };

    if !state.is_config_loaded() {
        return Err(Response::error(
            id,
            error_codes::NO_CONFIG_LOADED,
            "No configuration loaded. Call Load first.".to_string(),
        ));
    }

    let layers = match params.layers {
        None => None,
        Some(LayerList::Ids(ids)) => Some(ids),
        Some(LayerList::Encoded(text)) => match serde_json::from_str::<Vec<String>>(&text) {
            Ok(ids) => Some(ids),
            Err(e) => {
                return Err(Response::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid layers list: {}", e),
                ));
            }
        },
    };

    let area = match area_from_json_value(params.feature) {
        Ok(area) => area,
        Err(e) => {
            return Err(Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("{:#}", e),
            ));
        }
    };

    Ok(StatisticsJob {
        id,
        area,
        layers,
        config: Arc::clone(&state.config),
        rasters: Arc::clone(&state.rasters),
        options: state.compute_options(),
    })
}

/// Handle Cancel request - aborts every running statistics job
pub fn handle_cancel(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    state.cancel_running();
    Response::success(id, serde_json::json!({ "status": "ok" }))
}
