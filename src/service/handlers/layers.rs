//! Layer listing: GetLayers

use serde::Serialize;

use crate::service::protocol::{error_codes, Response};
use crate::service::state::ServerState;
use crate::stats::{LayerOrder, StatisticKind};

#[derive(Serialize)]
struct LayerSummary<'a> {
    id: &'a str,
    resolution: f64,
    statistics: &'a [StatisticKind],
    unit: &'a str,
    order: &'a LayerOrder,
    has_raster: bool,
}

/// Handle GetLayers request - lists configured layers in configuration order
pub fn handle_get_layers(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    if !state.is_config_loaded() {
        return Response::error(
            id,
            error_codes::NO_CONFIG_LOADED,
            "No configuration loaded. Call Load first.".to_string(),
        );
    }

    let layers: Vec<LayerSummary> = state
        .layers()
        .iter()
        .map(|(layer_id, config)| LayerSummary {
            id: layer_id,
            resolution: config.resolution,
            statistics: &config.statistics,
            unit: &config.unit,
            order: &config.order,
            has_raster: state.rasters.get(layer_id).is_some(),
        })
        .collect();

    match serde_json::to_value(layers) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}
