//! Mathematical utilities: lagged designs and least squares.

pub mod ols;

pub use ols::*;
