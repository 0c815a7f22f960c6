//! Bounded boxes used as action and observation spaces.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A box `[low_0, high_0] x ... x [low_n, high_n]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl BoxSpace {
    /// Constructs a box from its corners.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// The box `[low, high]^n`.
    pub fn uniform(low: f32, high: f32, n: usize) -> Self {
        Self::new(vec![low; n], vec![high; n])
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.low.len()
    }

    /// Lower corner.
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    /// Upper corner.
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    /// Returns `true` if `x` has the right length and lies inside the box.
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.len()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }

    /// Samples a point uniformly from the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&lo, &hi)| if lo < hi { rng.gen_range(lo..=hi) } else { lo })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_samples_are_contained() {
        let space = BoxSpace::new(vec![-1.0, 0.0, 5.0], vec![1.0, 3000.0, 5.0]);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
        assert!(!space.contains(&[0.0, 0.0]));
        assert!(!space.contains(&[0.0, -0.1, 5.0]));
        assert!(!space.contains(&[f32::NAN, 0.0, 5.0]));
    }
}
