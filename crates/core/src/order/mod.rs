//! Order check request and outcome types.

mod types;

pub use types::*;
