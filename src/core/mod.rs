pub mod attendance;
pub mod calculator;
pub mod live_market;
pub mod log;
pub mod logic;
pub mod punch;
pub mod sessions;
pub mod tasks;
pub mod write_sequence;
