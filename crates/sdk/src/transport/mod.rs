//! Transport layer for the Instantly SDK.

pub mod http;

pub use http::{query_pairs, ApiRequest, ApiResponse, HttpMethod, HttpTransport};
