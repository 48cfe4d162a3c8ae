//! Statistical models over joined grids
//!
//! - **regression**: ordinary least squares, R² and residuals

pub mod regression;

pub use regression::{apply_model, linear_regression, r_squared, RegressionModel};
