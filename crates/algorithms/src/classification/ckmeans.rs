//! Ckmeans: optimal 1-D clustering
//!
//! Partitions sorted values into `k` contiguous groups minimising the total
//! within-group sum of squared deviations. The dynamic program is exact;
//! each row is filled by divide and conquer over the (monotone) position of
//! the last cluster's first element, giving O(k·n·log n).
//!
//! Reference:
//! Wang, H. & Song, M. (2011). Ckmeans.1d.dp: Optimal k-means clustering
//! in one dimension by dynamic programming. The R Journal, 3(2).

use ndarray::Array2;
use nitramap_core::{Error, Result};

use super::breaks::{ClassBreaks, ClassRange};

/// Cluster `values` into `k` ascending groups of sorted values.
///
/// When there are fewer values than classes, every value gets its own
/// group.
///
/// # Errors
/// - `EmptyInput` for an empty slice
/// - `InvalidParameter` for `k == 0` or non-finite values
pub fn ckmeans(values: &[f64], k: usize) -> Result<Vec<Vec<f64>>> {
    if values.is_empty() {
        return Err(Error::EmptyInput("no values to classify".into()));
    }
    if k == 0 {
        return Err(Error::invalid_parameter("k", k, "at least one class is required"));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter("values", bad, "values must be finite"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let k = k.min(n);

    // Prefix sums around the median for numerical stability
    let shift = sorted[n / 2];
    let mut sums = vec![0.0; n + 1];
    let mut sums_sq = vec![0.0; n + 1];
    for (i, &v) in sorted.iter().enumerate() {
        let d = v - shift;
        sums[i + 1] = sums[i] + d;
        sums_sq[i + 1] = sums_sq[i] + d * d;
    }
    let ssq = |j: usize, i: usize| -> f64 {
        let count = (i - j + 1) as f64;
        let s = sums[i + 1] - sums[j];
        (sums_sq[i + 1] - sums_sq[j] - s * s / count).max(0.0)
    };

    // cost[[m, i]]: best cost of sorted[0..=i] in m + 1 clusters
    // start[[m, i]]: first index of the last of those clusters
    let mut cost = Array2::<f64>::zeros((k, n));
    let mut start = Array2::<usize>::zeros((k, n));
    for i in 0..n {
        cost[[0, i]] = ssq(0, i);
    }
    for m in 1..k {
        fill_row(m, m, n - 1, m, n - 1, &ssq, &mut cost, &mut start);
    }

    let mut clusters = Vec::with_capacity(k);
    let mut end = n - 1;
    for m in (0..k).rev() {
        let j = start[[m, end]];
        clusters.push(sorted[j..=end].to_vec());
        if m > 0 {
            end = j - 1;
        }
    }
    clusters.reverse();
    Ok(clusters)
}

/// Fill `cost[[m, lo..=hi]]`, knowing the optimal split for those
/// positions lies in `opt_lo..=opt_hi`.
#[allow(clippy::too_many_arguments)]
fn fill_row<F: Fn(usize, usize) -> f64>(
    m: usize,
    lo: usize,
    hi: usize,
    opt_lo: usize,
    opt_hi: usize,
    ssq: &F,
    cost: &mut Array2<f64>,
    start: &mut Array2<usize>,
) {
    if lo > hi {
        return;
    }
    let mid = lo + (hi - lo) / 2;

    let mut best = f64::INFINITY;
    let mut best_j = opt_lo;
    for j in opt_lo..=mid.min(opt_hi) {
        let c = cost[[m - 1, j - 1]] + ssq(j, mid);
        if c < best {
            best = c;
            best_j = j;
        }
    }
    cost[[m, mid]] = best;
    start[[m, mid]] = best_j;

    if mid > lo {
        fill_row(m, lo, mid - 1, opt_lo, best_j, ssq, cost, start);
    }
    fill_row(m, mid + 1, hi, best_j, opt_hi, ssq, cost, start);
}

/// Ckmeans class breaks: the `[min, max]` of each cluster.
pub fn ckmeans_breaks(values: &[f64], k: usize) -> Result<ClassBreaks> {
    let ranges = ckmeans(values, k)?
        .iter()
        .map(|c| ClassRange::new(c[0], c[c.len() - 1]))
        .collect();
    Ok(ClassBreaks::Clusters { ranges })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random values in [0, 100)
    fn lcg_values(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 33) % 10_000) as f64 / 100.0
            })
            .collect()
    }

    fn within_ss(clusters: &[Vec<f64>]) -> f64 {
        clusters
            .iter()
            .map(|c| {
                let mean = c.iter().sum::<f64>() / c.len() as f64;
                c.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            })
            .sum()
    }

    /// Plain O(k·n²) dynamic program
    fn brute_force_cost(values: &[f64], k: usize) -> f64 {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let ss = |j: usize, i: usize| {
            let seg = &sorted[j..=i];
            let mean = seg.iter().sum::<f64>() / seg.len() as f64;
            seg.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        };
        let mut d = vec![vec![f64::INFINITY; n]; k];
        for i in 0..n {
            d[0][i] = ss(0, i);
        }
        for m in 1..k {
            for i in m..n {
                for j in m..=i {
                    d[m][i] = d[m][i].min(d[m - 1][j - 1] + ss(j, i));
                }
            }
        }
        d[k - 1][n - 1]
    }

    #[test]
    fn test_known_clusters() {
        let values = [-1.0, 2.0, -1.0, 2.0, 4.0, 5.0, 6.0, -1.0, 2.0, -1.0];
        let clusters = ckmeans(&values, 3).unwrap();
        assert_eq!(
            clusters,
            vec![
                vec![-1.0, -1.0, -1.0, -1.0],
                vec![2.0, 2.0, 2.0],
                vec![4.0, 5.0, 6.0],
            ]
        );
    }

    #[test]
    fn test_matches_brute_force() {
        for (n, seed) in [(12, 1), (40, 7), (75, 42), (120, 2024)] {
            let values = lcg_values(n, seed);
            for k in 1..=6 {
                let clusters = ckmeans(&values, k).unwrap();
                let expected = brute_force_cost(&values, k);
                let got = within_ss(&clusters);
                assert!(
                    (got - expected).abs() < 1e-6 * expected.max(1.0),
                    "n={} k={}: got {} expected {}",
                    n,
                    k,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_partition_is_contiguous_and_complete() {
        let values = lcg_values(200, 99);
        let clusters = ckmeans(&values, 5).unwrap();
        assert_eq!(clusters.len(), 5);

        let flattened: Vec<f64> = clusters.iter().flatten().copied().collect();
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(flattened, sorted);

        let breaks = ckmeans_breaks(&values, 5).unwrap();
        match &breaks {
            ClassBreaks::Clusters { ranges } => {
                assert_eq!(ranges[0].lower, sorted[0]);
                assert_eq!(ranges[4].upper, sorted[199]);
                for w in ranges.windows(2) {
                    assert!(w[0].lower <= w[0].upper);
                    assert!(w[0].upper <= w[1].lower);
                }
            }
            other => panic!("unexpected breaks {:?}", other),
        }
        for v in &values {
            assert!(breaks.classify(*v).is_some());
        }
    }

    #[test]
    fn test_identical_values() {
        let clusters = ckmeans(&[3.0; 8], 5).unwrap();
        assert_eq!(clusters.len(), 5);
        assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), 8);
    }

    #[test]
    fn test_fewer_values_than_classes() {
        let clusters = ckmeans(&[0.3, 0.1], 5).unwrap();
        assert_eq!(clusters, vec![vec![0.1], vec![0.3]]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(ckmeans(&[], 5), Err(Error::EmptyInput(_))));
        assert!(matches!(ckmeans(&[1.0], 0), Err(Error::InvalidParameter { .. })));
        assert!(matches!(
            ckmeans(&[1.0, f64::NAN], 2),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
