//! Forecast strategies.
//!
//! - the strategy contract and registry (`strategy`)
//! - persistence baselines (`baseline`)
//! - autoregressive AR(p) (`autoregressive`)
//! - optional model persistence (`store`)

pub mod autoregressive;
pub mod baseline;
pub mod store;
pub mod strategy;

pub use autoregressive::*;
pub use baseline::*;
pub use store::*;
pub use strategy::*;
