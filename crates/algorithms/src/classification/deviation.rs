//! Standard-deviation bands
//!
//! Five classes separated at `[-2σ, -σ, σ, 2σ]`. The cut points are
//! multiples of σ around zero, not around the sample mean, which suits
//! regression residuals.

use nitramap_core::{Error, Result};

use super::breaks::ClassBreaks;

/// Sample standard deviation (`n - 1` denominator). A single value has
/// zero spread.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptyInput("no values for standard deviation".into()));
    }
    let n = values.len();
    if n == 1 {
        return Ok(0.0);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Deviation-band breaks for `values`.
pub fn deviation_breaks(values: &[f64]) -> Result<ClassBreaks> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter("values", bad, "values must be finite"));
    }
    let sigma = sample_std_dev(values)?;
    Ok(ClassBreaks::Deviation {
        sigma,
        cuts: [-2.0 * sigma, -sigma, sigma, 2.0 * sigma],
    })
}
