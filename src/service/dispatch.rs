//! Method routing for incoming requests

use crate::service::handlers::*;
use crate::service::protocol::{error_codes, Request, Response};
use crate::service::state::ServerState;

/// What the request loop should do with a request
pub enum Dispatch {
    /// Write this response immediately
    Respond(Response),
    /// Run this job, then write its response
    Run(StatisticsJob),
}

/// Route `request` to its handler
pub fn dispatch(state: &mut ServerState, request: Request) -> Dispatch {
    let Request { id, method, params } = request;

    let response = match method.as_str() {
        "Load" => handle_load(state, id, params),
        "GetLayers" => handle_get_layers(state, id),
        "ComputeStatistics" => match prepare_statistics_job(state, id, params) {
            Ok(job) => return Dispatch::Run(job),
            Err(response) => response,
        },
        "QueryValue" => handle_query_value(state, id, params),
        "Cancel" => handle_cancel(state, id),
        "GetMemory" => handle_get_memory(id),
        "Close" => handle_close(state, id),
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        ),
    };

    Dispatch::Respond(response)
}
