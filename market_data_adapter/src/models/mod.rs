pub mod bar;
pub mod info;
pub mod period;
pub mod quote;
pub mod request_params;
pub mod search;
pub mod timeframe;
