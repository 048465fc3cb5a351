//! Market data adapter: fetches bars and instrument metadata from an external
//! provider and reshapes them into the JSON-ready types served by the API.

pub mod errors;
pub mod models;
pub mod providers;
pub mod service;

pub use errors::UpstreamError;
pub use service::MarketDataService;
