//! Integer search space and optimisation results.
use anyhow::{ensure, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Box of integer points `[low_0, high_0] x ... x [low_n, high_n]`, bounds
/// included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    low: Vec<i64>,
    high: Vec<i64>,
}

impl SearchSpace {
    /// Constructs the space. Fails unless `low[i] <= high[i]` for every dimension.
    pub fn new(low: Vec<i64>, high: Vec<i64>) -> Result<Self> {
        ensure!(
            !low.is_empty() && low.len() == high.len(),
            "Invalid bounds {:?}, {:?}",
            low,
            high
        );
        ensure!(
            low.iter().zip(high.iter()).all(|(l, h)| l <= h),
            "Lower bounds {:?} exceed upper bounds {:?}",
            low,
            high
        );
        Ok(Self { low, high })
    }

    /// The space `{0, 1}^n`.
    pub fn binary(n: usize) -> Self {
        Self {
            low: vec![0; n],
            high: vec![1; n],
        }
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if `x` has the right length and lies inside the box.
    pub fn contains(&self, x: &[i64]) -> bool {
        x.len() == self.len()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (l, h))| l <= v && v <= h)
    }

    /// Number of points, saturating at `u64::MAX`.
    pub fn n_points(&self) -> u64 {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(l, h)| (h - l) as u64 + 1)
            .fold(1u64, |acc, n| acc.saturating_mul(n))
    }

    /// All points in lexicographic order.
    pub fn points(&self) -> Vec<Vec<i64>> {
        let mut points = vec![vec![]];
        for (&l, &h) in self.low.iter().zip(self.high.iter()) {
            points = points
                .into_iter()
                .flat_map(|p| {
                    (l..=h).map(move |v| {
                        let mut p = p.clone();
                        p.push(v);
                        p
                    })
                })
                .collect();
        }
        points
    }

    /// Samples a point uniformly.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<i64> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&l, &h)| rng.gen_range(l..=h))
            .collect()
    }
}

/// History and optimum of a minimisation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Evaluated points, in evaluation order.
    pub x_iters: Vec<Vec<i64>>,

    /// Objective values of `x_iters`.
    pub func_vals: Vec<f64>,

    /// Best point so far.
    pub x: Vec<i64>,

    /// Objective value of `x`.
    pub fun: f64,
}

impl Default for OptimizeResult {
    fn default() -> Self {
        Self {
            x_iters: vec![],
            func_vals: vec![],
            x: vec![],
            fun: f64::INFINITY,
        }
    }
}

impl OptimizeResult {
    /// Rebuilds a result from evaluated points and their values.
    pub fn from_history(x_iters: Vec<Vec<i64>>, func_vals: Vec<f64>) -> Result<Self> {
        ensure!(
            x_iters.len() == func_vals.len(),
            "{} points but {} values",
            x_iters.len(),
            func_vals.len()
        );
        let mut res = Self::default();
        for (x, y) in x_iters.into_iter().zip(func_vals) {
            res.push(x, y);
        }
        Ok(res)
    }

    /// Appends an evaluation.
    pub fn push(&mut self, x: Vec<i64>, y: f64) {
        if self.x_iters.is_empty() || y < self.fun {
            self.x = x.clone();
            self.fun = y;
        }
        self.x_iters.push(x);
        self.func_vals.push(y);
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.x_iters.len()
    }

    /// Returns `true` if nothing was evaluated.
    pub fn is_empty(&self) -> bool {
        self.x_iters.is_empty()
    }

    /// Returns `true` if `x` was evaluated.
    pub fn visited(&self, x: &[i64]) -> bool {
        self.x_iters.iter().any(|p| p.as_slice() == x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        let space = SearchSpace::binary(3);
        let points = space.points();
        assert_eq!(points.len() as u64, space.n_points());
        assert_eq!(points[0], vec![0, 0, 0]);
        assert_eq!(points[5], vec![1, 0, 1]);
        assert!(points.iter().all(|p| space.contains(p)));
        assert!(!space.contains(&[0, 2, 0]));
    }

    #[test]
    fn test_result_tracks_best() {
        let res = OptimizeResult::from_history(
            vec![vec![0, 1], vec![1, 1], vec![1, 0]],
            vec![0.5, -0.2, 0.1],
        )
        .unwrap();
        assert_eq!(res.x, vec![1, 1]);
        assert_eq!(res.fun, -0.2);
        assert!(res.visited(&[1, 0]));
        assert!(!res.visited(&[0, 0]));
    }
}
