//! Class breaks and value-to-class lookup

use serde::{Deserialize, Serialize};

/// Closed value range of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassRange {
    pub lower: f64,
    pub upper: f64,
}

impl ClassRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

/// Ordered class boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClassBreaks {
    /// One `[lower, upper]` range per cluster, ascending and non-overlapping
    Clusters { ranges: Vec<ClassRange> },
    /// Cut points `[-2σ, -σ, σ, 2σ]`, giving five classes:
    /// `≤ -2σ`, `≤ -σ`, `≤ σ`, `≤ 2σ` and `> 2σ`
    Deviation { sigma: f64, cuts: [f64; 4] },
}

impl ClassBreaks {
    /// Number of classes values can fall into
    pub fn class_count(&self) -> usize {
        match self {
            ClassBreaks::Clusters { ranges } => ranges.len(),
            ClassBreaks::Deviation { cuts, .. } => cuts.len() + 1,
        }
    }

    /// Class index of `value`: the first class whose upper bound is
    /// `>= value`, scanning in ascending order.
    ///
    /// For clusters, values above the last upper bound have no class. For
    /// deviation bands they fall into the final open-ended class. NaN never
    /// has a class.
    pub fn classify(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        match self {
            ClassBreaks::Clusters { ranges } => {
                let idx = ranges.partition_point(|r| r.upper < value);
                (idx < ranges.len()).then_some(idx)
            }
            ClassBreaks::Deviation { cuts, .. } => Some(cuts.partition_point(|&c| c < value)),
        }
    }

    /// `(lower, upper)` bounds of every class, infinite for open ends.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        match self {
            ClassBreaks::Clusters { ranges } => ranges.iter().map(|r| (r.lower, r.upper)).collect(),
            ClassBreaks::Deviation { cuts, .. } => {
                let mut edges = Vec::with_capacity(cuts.len() + 2);
                edges.push(f64::NEG_INFINITY);
                edges.extend_from_slice(cuts);
                edges.push(f64::INFINITY);
                edges.windows(2).map(|w| (w[0], w[1])).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> ClassBreaks {
        ClassBreaks::Clusters {
            ranges: vec![
                ClassRange::new(0.0, 1.0),
                ClassRange::new(2.0, 3.0),
                ClassRange::new(5.0, 8.0),
            ],
        }
    }

    #[test]
    fn test_classify_clusters() {
        let b = clusters();
        assert_eq!(b.class_count(), 3);
        assert_eq!(b.classify(0.0), Some(0));
        assert_eq!(b.classify(1.0), Some(0));
        // Between clusters: first class whose upper bound covers it
        assert_eq!(b.classify(1.5), Some(1));
        assert_eq!(b.classify(8.0), Some(2));
        assert_eq!(b.classify(8.5), None);
        assert_eq!(b.classify(-3.0), Some(0));
        assert_eq!(b.classify(f64::NAN), None);
    }

    #[test]
    fn test_classify_deviation() {
        let b = ClassBreaks::Deviation {
            sigma: 1.0,
            cuts: [-2.0, -1.0, 1.0, 2.0],
        };
        assert_eq!(b.class_count(), 5);
        assert_eq!(b.classify(-5.0), Some(0));
        assert_eq!(b.classify(-2.0), Some(0));
        assert_eq!(b.classify(-1.5), Some(1));
        assert_eq!(b.classify(0.0), Some(2));
        assert_eq!(b.classify(1.0), Some(2));
        assert_eq!(b.classify(1.5), Some(3));
        assert_eq!(b.classify(2.0), Some(3));
        assert_eq!(b.classify(2.5), Some(4));
    }

    #[test]
    fn test_bounds() {
        let b = ClassBreaks::Deviation {
            sigma: 0.5,
            cuts: [-1.0, -0.5, 0.5, 1.0],
        };
        let bounds = b.bounds();
        assert_eq!(bounds.len(), 5);
        assert_eq!(bounds[0], (f64::NEG_INFINITY, -1.0));
        assert_eq!(bounds[2], (-0.5, 0.5));
        assert_eq!(bounds[4], (1.0, f64::INFINITY));

        assert_eq!(clusters().bounds()[2], (5.0, 8.0));
    }
}
