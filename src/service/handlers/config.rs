//! Configuration operations: Load, Close

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::config::ServiceConfig;
use crate::service::protocol::{error_codes, Response};
use crate::service::state::ServerState;
use crate::service::util::get_process_memory_bytes;

/// Handle Load request - reads the layer configuration and its rasters
pub fn handle_load(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct LoadParams {
        config_path: PathBuf,
    }

    let params: LoadParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params: expected {config_path: string}".to_string(),
            );
        }
    };

    let start = Instant::now();

    let config = match ServiceConfig::from_file(&params.config_path) {
        Ok(config) => config,
        Err(e) => {
            return Response::error(id, error_codes::LOAD_FAILED, format!("{:#}", e));
        }
    };

    let base_dir = params
        .config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let rasters = match config.load_rasters(&base_dir) {
        Ok(rasters) => rasters,
        Err(e) => {
            return Response::error(id, error_codes::LOAD_FAILED, format!("{:#}", e));
        }
    };

    let layer_count = config.layers.len();
    let raster_count = rasters.len();
    state.install(params.config_path, config, rasters);

    info!(
        layers = layer_count,
        rasters = raster_count,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "configuration loaded"
    );

    Response::success(
        id,
        serde_json::json!({
            "status": "ok",
            "layer_count": layer_count,
            "raster_count": raster_count
        }),
    )
}

/// Handle Close request - releases configuration and rasters
pub fn handle_close(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let old_memory = get_process_memory_bytes().unwrap_or(0);
    state.cancel_running();
    state.clear();
    let new_memory = get_process_memory_bytes().unwrap_or(0);

    info!(
        freed_bytes = old_memory.saturating_sub(new_memory),
        "configuration closed"
    );

    Response::success(id, serde_json::json!({ "status": "ok" }))
}
