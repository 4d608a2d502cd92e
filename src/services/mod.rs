pub mod issues;
pub mod monitor;
pub mod state_store;
pub mod yahoo;
