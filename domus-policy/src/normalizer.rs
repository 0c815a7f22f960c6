//! Running normalisation of observations.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Standardises observations with running estimates of their mean and
/// variance, then clips them to `[-clip_obs, clip_obs]`.
///
/// Statistics are updated explicitly with [`ObsNormalizer::update`]; callers
/// freeze them during evaluation by not updating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObsNormalizer {
    mean: Vec<f64>,
    var: Vec<f64>,
    count: f64,
    clip_obs: f32,
    epsilon: f64,
}

impl ObsNormalizer {
    /// Normaliser with zero mean and unit variance for `dim` dimensions.
    pub fn new(dim: usize, clip_obs: f32) -> Self {
        Self {
            mean: vec![0.0; dim],
            var: vec![1.0; dim],
            count: 1e-4,
            clip_obs,
            epsilon: 1e-8,
        }
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Running mean.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Running variance.
    pub fn var(&self) -> &[f64] {
        &self.var
    }

    /// Adds one observation to the statistics.
    pub fn update(&mut self, x: &[f32]) {
        let tot = self.count + 1.0;
        for ((m, v), &x) in self.mean.iter_mut().zip(self.var.iter_mut()).zip(x.iter()) {
            let delta = x as f64 - *m;
            let m2 = *v * self.count + delta * delta * self.count / tot;
            *m += delta / tot;
            *v = m2 / tot;
        }
        self.count = tot;
    }

    /// Normalises an observation.
    pub fn normalize(&self, x: &[f32]) -> Vec<f32> {
        let clip = self.clip_obs as f64;
        x.iter()
            .zip(self.mean.iter().zip(self.var.iter()))
            .map(|(&x, (m, v))| ((x as f64 - m) / (v + self.epsilon).sqrt()).clamp(-clip, clip) as f32)
            .collect()
    }

    /// Loads the statistics from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    /// Saves the statistics to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_statistics() {
        let mut norm = ObsNormalizer::new(2, 10.0);
        for x in [[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]] {
            norm.update(&x);
        }
        assert!((norm.mean()[0] - 3.0).abs() < 1e-3);
        assert!((norm.var()[0] - 8.0 / 3.0).abs() < 1e-2);
        assert!(norm.var()[1] < 1e-2);

        let y = norm.normalize(&[3.0, 1000.0]);
        assert!(y[0].abs() < 1e-3);
        assert_eq!(y[1], 10.0);
    }
}
