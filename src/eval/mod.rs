//! Walk-forward evaluation core.
//!
//! Responsibilities:
//!
//! - cut a daily series into weekly train/test blocks (`window`)
//! - run strategies week by week over the test blocks (`walk_forward`)
//! - score predictions per day offset and pooled (`scorer`)

pub mod scorer;
pub mod walk_forward;
pub mod window;

pub use scorer::*;
pub use walk_forward::*;
pub use window::*;
