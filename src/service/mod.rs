//! JSON-RPC surface for the statistics service
//!
//! Requests arrive one per line on stdin and responses are written one per
//! line on stdout (see `bin/stats_server.rs`).
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types and error codes
//! - `state` - Loaded configuration and rasters
//! - `util` - Process memory reporting
//! - `handlers` - Request handlers
//! - `dispatch` - Method name routing

pub mod dispatch;
pub mod handlers;
pub mod protocol;
pub mod state;
pub mod util;

pub use dispatch::dispatch;
pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::ServerState;
