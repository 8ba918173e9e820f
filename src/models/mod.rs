pub mod day_summary;
pub mod market_summary;
pub mod session;
pub mod status;
pub mod task;
