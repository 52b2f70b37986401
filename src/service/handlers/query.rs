//! Query handlers: QueryValue, GetMemory

use serde::Deserialize;

use crate::raster::RasterLookup;
use crate::service::protocol::{error_codes, Response};
use crate::service::state::ServerState;
use crate::service::util::get_process_memory_bytes;

/// Handle QueryValue request - raster value of one layer at one point
pub fn handle_query_value(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct QueryValueParams {
        layer: String,
        x: f64,
        y: f64,
    }

    let params: QueryValueParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params: expected {layer: string, x: number, y: number}".to_string(),
            );
        }
    };

    if !state.is_config_loaded() {
        return Response::error(
            id,
            error_codes::NO_CONFIG_LOADED,
            "No configuration loaded. Call Load first.".to_string(),
        );
    }

    if state.layers().get(&params.layer).is_none() {
        return Response::error(
            id,
            error_codes::LAYER_NOT_FOUND,
            format!("Layer {} not found", params.layer),
        );
    }

    match state.rasters.lookup(&params.layer, params.x, params.y) {
        Ok(value) => Response::success(
            id,
            serde_json::json!({ "layer": params.layer, "value": value }),
        ),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("{:#}", e)),
    }
}

/// Handle GetMemory request - returns current process memory usage
pub fn handle_get_memory(id: Option<serde_json::Value>) -> Response {
    let memory_bytes = get_process_memory_bytes();
    let memory_mb = memory_bytes.map(|b| b as f64 / 1024.0 / 1024.0);
    Response::success(
        id,
        serde_json::json!({
            "memory_bytes": memory_bytes,
            "memory_mb": memory_mb
        }),
    )
}
