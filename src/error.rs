//! Error taxonomy for statistics requests
//!
//! Every failure a statistics computation can produce is one variant of
//! [`StatisticsError`]. The JSON-RPC surface maps them to error codes via
//! [`StatisticsError::class`] rather than by inspecting messages.

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, StatisticsError>;

/// Errors raised while sampling a geometry or aggregating layer values
#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("Layer {0} not found")]
    UnknownLayer(String),

    #[error("Target area proportion of geometry is too low ({percent}%)")]
    DegenerateGeometry { percent: f64 },

    #[error("invalid sampling resolution {resolution}")]
    InvalidResolution { resolution: f64 },

    #[error("geometry is empty")]
    EmptyGeometry,

    #[error("geometry area {area} exceeds the configured limit of {limit}")]
    AreaTooLarge { area: f64, limit: f64 },

    #[error("statistics computation was cancelled")]
    Cancelled,

    #[error("raster lookup failed for layer {layer}: {source}")]
    Lookup {
        layer: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Coarse classification used by callers to pick a response code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller referenced something that does not exist
    NotFound,
    /// The request itself is malformed or out of bounds
    InvalidInput,
    /// Server-side failure (degenerate geometry is reported here for parity)
    Internal,
    Cancelled,
}

impl StatisticsError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StatisticsError::UnknownLayer(_) => ErrorClass::NotFound,
            StatisticsError::InvalidResolution { .. }
            | StatisticsError::EmptyGeometry
            | StatisticsError::AreaTooLarge { .. } => ErrorClass::InvalidInput,
            StatisticsError::DegenerateGeometry { .. } | StatisticsError::Lookup { .. } => {
                ErrorClass::Internal
            }
            StatisticsError::Cancelled => ErrorClass::Cancelled,
        }
    }
}
