//! Yahoo Finance REST provider.
//!
//! Bars come from the v8 chart endpoint and metadata from v10 quoteSummary.
//! Yahoo has no official API and changes its payloads without notice, so the
//! decoding in [`response`] is deliberately lenient about absent fields and
//! strict about rows it cannot interpret.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{YahooConfig, YahooProvider};
