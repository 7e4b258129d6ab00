//! Transport layer for the inventory SDK.

pub mod http;

pub use http::HttpTransport;
