//! Bounded search domains for equilibrium discovery.

use serde::{Deserialize, Serialize};

/// The feasible region of a state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    /// `[0, 1]^dim`
    UnitBox { dim: usize },
    /// `x_i >= 0` and `sum(x_i) <= 1`
    Simplex { dim: usize },
}

impl Domain {
    pub fn unit_interval() -> Self {
        Domain::UnitBox { dim: 1 }
    }

    pub fn simplex(dim: usize) -> Self {
        Domain::Simplex { dim }
    }

    pub fn dimension(&self) -> usize {
        match *self {
            Domain::UnitBox { dim } | Domain::Simplex { dim } => dim,
        }
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        if point.len() != self.dimension() {
            return false;
        }
        match self {
            Domain::UnitBox { .. } => point.iter().all(|x| (0.0..=1.0).contains(x)),
            Domain::Simplex { .. } => {
                point.iter().all(|&x| x >= 0.0) && point.iter().sum::<f64>() <= 1.0
            }
        }
    }

    /// Exact containment test on fixed-point keys (`x_i = key_i / scale`).
    ///
    /// Used on rounded candidates so that e.g. `0.3 + 0.7` cannot be rejected by
    /// a one-ulp overshoot.
    pub fn contains_key(&self, key: &[i64], scale: i64) -> bool {
        if key.len() != self.dimension() {
            return false;
        }
        match self {
            Domain::UnitBox { .. } => key.iter().all(|&k| (0..=scale).contains(&k)),
            Domain::Simplex { .. } => {
                key.iter().all(|&k| k >= 0) && key.iter().sum::<i64>() <= scale
            }
        }
    }

    /// Evenly spaced probe points, `samples` per axis on `[0, 1]`, filtered to the
    /// domain. Traversal is lexicographic with the first coordinate outermost.
    pub fn grid(&self, samples: usize) -> Vec<Vec<f64>> {
        let dim = self.dimension();
        if dim == 0 || samples == 0 {
            return Vec::new();
        }
        let axis = linspace(0.0, 1.0, samples);
        let last = samples - 1;

        let mut points = Vec::new();
        let mut idx = vec![0usize; dim];
        loop {
            let in_domain = match self {
                Domain::UnitBox { .. } => true,
                // Compare on integer indices; the float sum of grid values drifts.
                Domain::Simplex { .. } => idx.iter().sum::<usize>() <= last,
            };
            if in_domain {
                points.push(idx.iter().map(|&i| axis[i]).collect());
            }

            let mut axis_pos = dim;
            loop {
                if axis_pos == 0 {
                    return points;
                }
                axis_pos -= 1;
                idx[axis_pos] += 1;
                if idx[axis_pos] < samples {
                    break;
                }
                idx[axis_pos] = 0;
            }
        }
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_endpoints() {
        let axis = linspace(0.0, 1.0, 21);
        assert_eq!(axis.len(), 21);
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[20], 1.0);
        assert!((axis[1] - 0.05).abs() < 1e-15);
    }

    #[test]
    fn interval_grid_is_plain_linspace() {
        let grid = Domain::unit_interval().grid(5);
        let flat: Vec<f64> = grid.into_iter().map(|p| p[0]).collect();
        assert_eq!(flat, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn simplex_grid_keeps_triangle_in_order() {
        let grid = Domain::simplex(2).grid(21);
        // 21 + 20 + ... + 1 points in the lower triangle.
        assert_eq!(grid.len(), 231);
        assert_eq!(grid[0], vec![0.0, 0.0]);
        assert_eq!(grid[1], vec![0.0, 0.05]);
        assert_eq!(grid[20], vec![0.0, 1.0]);
        assert_eq!(grid[21], vec![0.05, 0.0]);
        assert_eq!(grid.last(), Some(&vec![1.0, 0.0]));
    }

    #[test]
    fn unit_box_grid_is_full_product() {
        let grid = Domain::UnitBox { dim: 2 }.grid(3);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[3], vec![0.5, 0.0]);
    }

    #[test]
    fn containment_checks() {
        let simplex = Domain::simplex(2);
        assert!(simplex.contains(&[0.3, 0.7]));
        assert!(!simplex.contains(&[0.6, 0.7]));
        assert!(!simplex.contains(&[-0.1, 0.2]));
        assert!(!simplex.contains(&[0.1]));

        let interval = Domain::unit_interval();
        assert!(interval.contains(&[0.0]));
        assert!(interval.contains(&[1.0]));
        assert!(!interval.contains(&[1.000001]));
    }

    #[test]
    fn key_containment_is_exact() {
        let simplex = Domain::simplex(2);
        assert!(simplex.contains_key(&[30_000, 70_000], 100_000));
        assert!(!simplex.contains_key(&[30_001, 70_000], 100_000));
        assert!(!Domain::unit_interval().contains_key(&[-1], 100_000));
    }
}
