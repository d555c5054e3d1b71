//! Input/output helpers.
//!
//! - CSV ingest of the daily series (`ingest`)
//! - score and prediction exports to CSV (`export`)
//! - scores JSON read/write (`scores`)
//! - fitted model JSON read/write (`model`)

pub mod export;
pub mod ingest;
pub mod model;
pub mod scores;

pub use export::*;
pub use ingest::*;
pub use model::*;
pub use scores::*;
