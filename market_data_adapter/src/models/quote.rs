use serde::{Deserialize, Serialize};

use crate::models::{bar::Bar, info::InstrumentInfo};

/// Everything a client needs to chart and describe one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub symbol: String,
    /// Bars in provider order (ascending timestamps).
    pub data: Vec<Bar>,
    pub info: InstrumentInfo,
}
