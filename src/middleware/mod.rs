//! Middleware module
//!
//! HTTP middleware shared by the server and the API Gateway Lambda.

pub mod logging;

pub use logging::{log_request, RequestId, REQUEST_ID_HEADER};
