//! HTTP service boundary
//!
//! Thin request/response glue over the capture core. Callers never see
//! raw strokes or pixel buffers; they get a base64 PNG or a
//! cancellation indicator.

pub mod http_server;
pub mod shared;

pub use http_server::run_http_server;
pub use shared::SharedState;
