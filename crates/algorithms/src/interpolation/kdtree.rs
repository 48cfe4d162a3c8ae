//! 2D k-d tree for spatial indexing
//!
//! Radius queries over scattered points. The spatial join uses it to find
//! the lattice points that can possibly fall inside a hexagon before running
//! the exact containment test.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use super::SamplePoint;

/// A 2D k-d tree over sample points.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    /// Points in their original order
    points: Vec<SamplePoint>,
}

#[derive(Debug)]
struct KdNode {
    /// Index into `points`
    point_idx: usize,
    /// Split dimension: 0 = x, 1 = y
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// A sample found by a radius query
#[derive(Debug, Clone, Copy)]
pub struct RadiusMatch {
    pub point: SamplePoint,
    pub distance_sq: f64,
    /// Index of the point in the slice the tree was built from
    pub index: usize,
}

impl KdTree {
    /// Build a k-d tree from sample points.
    ///
    /// Construction is O(n log n) using median-of-coordinate splitting.
    pub fn build(points: &[SamplePoint]) -> Self {
        if points.is_empty() {
            return Self {
                nodes: Vec::new(),
                points: Vec::new(),
            };
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        build_recursive(points, &mut indices, 0, &mut nodes);

        Self {
            nodes,
            points: points.to_vec(),
        }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find all points within `radius` of (qx, qy), boundary included.
    ///
    /// Results are sorted by their index in the input slice.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<RadiusMatch> {
        if self.nodes.is_empty() || !(radius >= 0.0) {
            return Vec::new();
        }

        let mut results = Vec::new();
        self.radius_recursive(0, qx, qy, radius * radius, &mut results);
        results.sort_by_key(|r| r.index);
        results
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        radius_sq: f64,
        results: &mut Vec<RadiusMatch>,
    ) {
        let node = &self.nodes[node_idx];
        let p = &self.points[node.point_idx];

        let dx = qx - p.x;
        let dy = qy - p.y;
        let dist_sq = dx * dx + dy * dy;

        if dist_sq <= radius_sq {
            results.push(RadiusMatch {
                point: *p,
                distance_sq: dist_sq,
                index: node.point_idx,
            });
        }

        let diff = if node.split_dim == 0 { dx } else { dy };
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = near {
            self.radius_recursive(child, qx, qy, radius_sq, results);
        }
        // The far side can only hold matches if the splitting line is in reach
        if diff * diff <= radius_sq {
            if let Some(child) = far {
                self.radius_recursive(child, qx, qy, radius_sq, results);
            }
        }
    }
}

/// Recursively build the k-d tree.
fn build_recursive(
    points: &[SamplePoint],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let n = indices.len();
    let split_dim = (depth % 2) as u8;

    let coord = |i: usize| if split_dim == 0 { points[i].x } else { points[i].y };
    indices.sort_by(|&a, &b| coord(a).total_cmp(&coord(b)));

    let median = n / 2;
    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx: indices[median],
        split_dim,
        left: None,
        right: None,
    });

    let (left, rest) = indices.split_at_mut(median);
    let right = &mut rest[1..];

    if !left.is_empty() {
        let left_idx = build_recursive(points, left, depth + 1, nodes);
        nodes[node_idx].left = Some(left_idx);
    }
    if !right.is_empty() {
        let right_idx = build_recursive(points, right, depth + 1, nodes);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(2.0, 3.0, 10.0),
            SamplePoint::new(5.0, 4.0, 20.0),
            SamplePoint::new(9.0, 6.0, 30.0),
            SamplePoint::new(4.0, 7.0, 40.0),
            SamplePoint::new(8.0, 1.0, 50.0),
            SamplePoint::new(7.0, 2.0, 60.0),
            SamplePoint::new(1.0, 8.0, 70.0),
            SamplePoint::new(6.0, 5.0, 80.0),
        ]
    }

    #[test]
    fn test_build_and_size() {
        let tree = KdTree::build(&sample_points());
        assert_eq!(tree.len(), 8);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.within_radius(0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_within_radius_matches_brute_force() {
        let pts = sample_points();
        let tree = KdTree::build(&pts);

        for qx in 0..10 {
            for qy in 0..10 {
                let (qx, qy) = (qx as f64 + 0.25, qy as f64 - 0.5);
                for radius in [0.5, 1.5, 3.0, 20.0] {
                    let found: Vec<usize> =
                        tree.within_radius(qx, qy, radius).iter().map(|r| r.index).collect();
                    let expected: Vec<usize> = pts
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.dist_sq(qx, qy) <= radius * radius)
                        .map(|(i, _)| i)
                        .collect();
                    assert_eq!(found, expected, "query ({}, {}) r={}", qx, qy, radius);
                }
            }
        }
    }

    #[test]
    fn test_within_radius_zero_hits_exact_point() {
        let tree = KdTree::build(&sample_points());
        let results = tree.within_radius(5.0, 4.0, 0.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].point.value, 20.0);
    }

    #[test]
    fn test_duplicate_coordinates() {
        let pts: Vec<SamplePoint> = (0..6).map(|i| SamplePoint::new(1.0, 1.0, i as f64)).collect();
        let tree = KdTree::build(&pts);
        let results = tree.within_radius(1.0, 1.0, 0.1);
        let idx: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4, 5]);
    }
}
