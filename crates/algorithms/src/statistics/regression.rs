//! Ordinary least squares on paired observations

use nitramap_core::grid::JoinedGrid;
use nitramap_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fitted line `y = slope·x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination on the fitting pairs
    pub r_squared: f64,
}

impl RegressionModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// `predict(x) - y`
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        self.predict(x) - y
    }
}

/// Fit an OLS line through `(x, y)` pairs.
///
/// # Errors
/// - `InsufficientData` for fewer than two pairs or when every `x` is the
///   same
/// - `Algorithm` when a pair is not finite
pub fn linear_regression(pairs: &[(f64, f64)]) -> Result<RegressionModel> {
    if pairs.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "regression needs at least 2 pairs, got {}",
            pairs.len()
        )));
    }
    if pairs.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(Error::Algorithm("regression input contains non-finite values".into()));
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    if all_equal(pairs.iter().map(|p| p.0)) {
        return Err(Error::InsufficientData(
            "explanatory variable has zero variance".into(),
        ));
    }

    // Two distinct x values put at least one off the mean, so sxx > 0
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let mut model = RegressionModel {
        slope,
        intercept,
        r_squared: 0.0,
    };
    model.r_squared = r_squared(pairs, &model);
    Ok(model)
}

/// `1 - SS_res / SS_tot`, or 0 when all `y` are equal.
pub fn r_squared(pairs: &[(f64, f64)], model: &RegressionModel) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    if all_equal(pairs.iter().map(|p| p.1)) {
        return 0.0;
    }

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for &(x, y) in pairs {
        ss_res += model.residual(x, y).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    1.0 - ss_res / ss_tot
}

fn all_equal(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Copy of `grid` with `predicted` and `residual` filled in on every cell
/// that has a joined value. Other cells are left without them.
pub fn apply_model(grid: &JoinedGrid, model: &RegressionModel) -> JoinedGrid {
    let mut out = grid.clone();
    for cell in &mut out.cells {
        match cell.joined {
            Some(y) => {
                let predicted = model.predict(cell.value);
                cell.predicted = Some(predicted);
                cell.residual = Some(predicted - y);
            }
            None => {
                cell.predicted = None;
                cell.residual = None;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use nitramap_core::grid::JoinedCell;

    #[test]
    fn test_perfect_line() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 3.0 * i as f64 + 1.0)).collect();
        let m = linear_regression(&pairs).unwrap();
        assert!((m.slope - 3.0).abs() < 1e-12);
        assert!((m.intercept - 1.0).abs() < 1e-12);
        assert!((m.r_squared - 1.0).abs() < 1e-12);
        assert!((m.predict(20.0) - 61.0).abs() < 1e-9);
        assert!(m.residual(2.0, 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_fit() {
        // Textbook example: slope 0.6, intercept 2.2, R² 0.6
        let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 5.0), (4.0, 4.0), (5.0, 5.0)];
        let m = linear_regression(&pairs).unwrap();
        assert!((m.slope - 0.6).abs() < 1e-12);
        assert!((m.intercept - 2.2).abs() < 1e-12);
        assert!((m.r_squared - 0.6).abs() < 1e-12);
        // Residual sign: prediction above the observation is positive
        assert!((m.residual(1.0, 2.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_constant_y_has_zero_r_squared() {
        let pairs = [(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)];
        let m = linear_regression(&pairs).unwrap();
        assert!(m.slope.abs() < 1e-12);
        assert!((m.intercept - 4.0).abs() < 1e-12);
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn test_large_offset_keeps_precision() {
        let m = linear_regression(&[(1e8, 1.0), (1e8 + 1.0, 2.0), (1e8 + 2.0, 3.0)]).unwrap();
        assert!((m.slope - 1.0).abs() < 1e-9);
        assert!((m.r_squared - 1.0).abs() < 1e-9);

        let m = linear_regression(&[(1.0, 1e8 + 1.0), (2.0, 1e8 + 2.0), (3.0, 1e8 + 3.0)]).unwrap();
        assert!((m.slope - 1.0).abs() < 1e-9);
        assert!((m.intercept - 1e8).abs() < 1e-6);
        assert!((m.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_inexact_x_is_zero_variance() {
        assert!(matches!(
            linear_regression(&[(0.1, 1.0), (0.1, 2.0), (0.1, 3.0)]),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(linear_regression(&[]), Err(Error::InsufficientData(_))));
        assert!(matches!(
            linear_regression(&[(1.0, 2.0)]),
            Err(Error::InsufficientData(_))
        ));
        assert!(matches!(
            linear_regression(&[(2.0, 1.0), (2.0, 5.0), (2.0, 3.0)]),
            Err(Error::InsufficientData(_))
        ));
        assert!(matches!(
            linear_regression(&[(1.0, 1.0), (f64::NAN, 2.0)]),
            Err(Error::Algorithm(_))
        ));
    }

    #[test]
    fn test_apply_model_skips_unjoined_cells() {
        let cell = |value: f64, joined: Option<f64>| JoinedCell {
            center: Point::new(0.0, 0.0),
            boundary: None,
            value,
            joined,
            joined_count: joined.map_or(0, |_| 1),
            predicted: None,
            residual: None,
        };
        let grid = JoinedGrid {
            attribute: "nitr_ran".into(),
            joined_attribute: "canrate".into(),
            cell_size_km: 1.0,
            cells: vec![cell(1.0, Some(3.0)), cell(2.0, None), cell(3.0, Some(11.0))],
        };
        let model = RegressionModel {
            slope: 3.0,
            intercept: 1.0,
            r_squared: 1.0,
        };
        let out = apply_model(&grid, &model);
        assert_eq!(out.cells[0].predicted, Some(4.0));
        assert_eq!(out.cells[0].residual, Some(1.0));
        assert_eq!(out.cells[1].predicted, None);
        assert_eq!(out.cells[1].residual, None);
        assert_eq!(out.cells[2].residual, Some(-1.0));
        assert_eq!(out.residuals(), vec![1.0, -1.0]);
    }
}
