//! JSON-RPC protocol types for the statistics service

use serde::{Deserialize, Serialize};

use crate::error::{ErrorClass, StatisticsError};

/// JSON-RPC Request format
#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC Response format
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

/// JSON-RPC Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl Response {
    /// Create a success response with a JSON value
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Response {
            id,
            result: None,
            error: Some(ErrorResponse { code, message }),
        }
    }

    /// Map a statistics failure onto its JSON-RPC error code
    pub fn from_statistics_error(id: Option<serde_json::Value>, err: &StatisticsError) -> Self {
        let code = match err.class() {
            ErrorClass::NotFound => error_codes::LAYER_NOT_FOUND,
            ErrorClass::InvalidInput => error_codes::INVALID_PARAMS,
            ErrorClass::Internal => error_codes::INTERNAL_ERROR,
            ErrorClass::Cancelled => error_codes::REQUEST_CANCELLED,
        };
        Response::error(id, code, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const REQUEST_CANCELLED: i32 = -32800;

    // Custom error codes
    pub const NO_CONFIG_LOADED: i32 = 2;
    pub const LAYER_NOT_FOUND: i32 = 3;
    pub const LOAD_FAILED: i32 = 4;
}
