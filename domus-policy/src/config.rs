//! Configuration of [`MlpAgent`](crate::MlpAgent).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`MlpAgent`](crate::MlpAgent).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MlpAgentConfig {
    /// Observation size.
    pub obs_dim: usize,

    /// Action size.
    pub act_dim: usize,

    /// Sizes of the hidden layers.
    pub hidden_dims: Vec<usize>,

    /// Initial standard deviation of the parameter perturbations.
    pub sigma: f32,

    /// Number of environment steps used to score one candidate.
    pub rollout_len: usize,

    /// Normalised observations are clipped to `[-clip_obs, clip_obs]`.
    pub clip_obs: f32,

    /// Random seed of initialisation and perturbations.
    pub seed: u64,
}

impl Default for MlpAgentConfig {
    fn default() -> Self {
        Self {
            obs_dim: 10,
            act_dim: 7,
            hidden_dims: vec![64, 64],
            sigma: 0.05,
            rollout_len: 200,
            clip_obs: 10.0,
            seed: 42,
        }
    }
}

impl MlpAgentConfig {
    /// Sets the observation size.
    pub fn obs_dim(mut self, v: usize) -> Self {
        self.obs_dim = v;
        self
    }

    /// Sets the action size.
    pub fn act_dim(mut self, v: usize) -> Self {
        self.act_dim = v;
        self
    }

    /// Sets the sizes of the hidden layers.
    pub fn hidden_dims(mut self, v: Vec<usize>) -> Self {
        self.hidden_dims = v;
        self
    }

    /// Sets the initial perturbation scale.
    pub fn sigma(mut self, v: f32) -> Self {
        self.sigma = v;
        self
    }

    /// Sets the rollout length.
    pub fn rollout_len(mut self, v: usize) -> Self {
        self.rollout_len = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Layer sizes, input first.
    pub fn layer_dims(&self) -> Vec<usize> {
        let mut dims = vec![self.obs_dim];
        dims.extend(self.hidden_dims.iter().copied());
        dims.push(self.act_dim);
        dims
    }

    /// Constructs [`MlpAgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MlpAgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
