pub mod issue;
pub mod price;
pub mod snapshot;
pub mod state;
