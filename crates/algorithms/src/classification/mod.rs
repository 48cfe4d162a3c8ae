//! Value classification for choropleth rendering
//!
//! Two methods are available:
//! - **Ckmeans**: optimal variance-minimising clusters of sorted values
//! - **Deviation bands**: `[-2σ, -σ, σ, 2σ]` cut points around zero

mod breaks;
mod ckmeans;
mod deviation;

pub use breaks::{ClassBreaks, ClassRange};
pub use ckmeans::{ckmeans, ckmeans_breaks};
pub use deviation::{deviation_breaks, sample_std_dev};

use nitramap_core::Result;
use serde::{Deserialize, Serialize};

/// Default number of ckmeans classes
pub const DEFAULT_CLASS_COUNT: usize = 5;

/// How to derive class breaks from a set of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ClassificationMethod {
    Ckmeans { classes: usize },
    DeviationBands,
}

impl Default for ClassificationMethod {
    fn default() -> Self {
        ClassificationMethod::Ckmeans {
            classes: DEFAULT_CLASS_COUNT,
        }
    }
}

impl ClassificationMethod {
    /// Compute breaks for `values`.
    ///
    /// Fails with `EmptyInput` when `values` is empty.
    pub fn breaks(&self, values: &[f64]) -> Result<ClassBreaks> {
        match *self {
            ClassificationMethod::Ckmeans { classes } => ckmeans_breaks(values, classes),
            ClassificationMethod::DeviationBands => deviation_breaks(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitramap_core::Error;

    #[test]
    fn test_methods() {
        let values = [1.0, 1.1, 1.2, 5.0, 5.1, 9.0, 9.3, 13.0, 17.0, 17.5];
        let b = ClassificationMethod::default().breaks(&values).unwrap();
        assert_eq!(b.class_count(), 5);
        assert_eq!(b.classify(1.0), Some(0));
        assert_eq!(b.classify(17.5), Some(4));

        let d = ClassificationMethod::DeviationBands.breaks(&values).unwrap();
        assert_eq!(d.class_count(), 5);
    }

    #[test]
    fn test_empty_input_propagates() {
        for m in [ClassificationMethod::default(), ClassificationMethod::DeviationBands] {
            assert!(matches!(m.breaks(&[]), Err(Error::EmptyInput(_))));
        }
    }
}
