//! Action nodes: side-effecting steps (logging, HTTP requests)

mod http;
mod log;

pub use http::HttpActionNode;
pub use log::LogNode;
