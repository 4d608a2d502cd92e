pub mod alert;
pub mod config;
pub mod drawdown;
pub mod message;
pub mod thresholds;
