//! Black-box minimisation over integer points.
use crate::{OptimizeResult, SearchSpace};
use anyhow::{ensure, Result};
use log::{debug, info};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

/// Spaces with at most this many points are enumerated when proposing.
const MAX_ENUMERATED_POINTS: u64 = 1 << 12;

/// Number of draws spent looking for an unvisited point in large spaces.
const MAX_DRAWS: usize = 100;

/// A black-box minimiser.
pub trait Minimizer {
    /// Minimises `func` over `space` with `n_calls` new evaluations.
    ///
    /// Evaluations in `history` are taken as already done and are not repeated.
    /// `callback` is invoked with the running result after every evaluation;
    /// an error from it or from `func` stops the minimisation.
    fn minimize(
        &mut self,
        func: &mut dyn FnMut(&[i64]) -> Result<f64>,
        space: &SearchSpace,
        n_calls: usize,
        history: Option<OptimizeResult>,
        callback: &mut dyn FnMut(&OptimizeResult) -> Result<()>,
    ) -> Result<OptimizeResult>;
}

/// Uniform random search preferring points that were not evaluated yet.
pub struct RandomSearch {
    rng: SmallRng,
}

impl RandomSearch {
    /// Constructs the minimiser with a random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn propose(&mut self, space: &SearchSpace, res: &OptimizeResult) -> Vec<i64> {
        if space.n_points() <= MAX_ENUMERATED_POINTS {
            let unvisited: Vec<_> = space
                .points()
                .into_iter()
                .filter(|p| !res.visited(p))
                .collect();
            if let Some(p) = unvisited.choose(&mut self.rng) {
                return p.clone();
            }
        } else {
            for _ in 0..MAX_DRAWS {
                let p = space.sample(&mut self.rng);
                if !res.visited(&p) {
                    return p;
                }
            }
        }
        space.sample(&mut self.rng)
    }
}

impl Minimizer for RandomSearch {
    fn minimize(
        &mut self,
        func: &mut dyn FnMut(&[i64]) -> Result<f64>,
        space: &SearchSpace,
        n_calls: usize,
        history: Option<OptimizeResult>,
        callback: &mut dyn FnMut(&OptimizeResult) -> Result<()>,
    ) -> Result<OptimizeResult> {
        let mut res = history.unwrap_or_default();
        ensure!(
            res.x_iters.iter().all(|x| space.contains(x)),
            "History contains points outside of the search space"
        );
        if !res.is_empty() {
            info!("Resuming from {} evaluations, best {:?} = {}", res.len(), res.x, res.fun);
        }

        for i in 0..n_calls {
            let x = self.propose(space, &res);
            debug!("Call {}/{}: {:?}", i + 1, n_calls, x);
            let y = func(&x)?;
            res.push(x, y);
            callback(&res)?;
        }
        Ok(res)
    }
}
