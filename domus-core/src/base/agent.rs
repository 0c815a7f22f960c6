//! Agent.
use super::{Env, Policy};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// This is the seam to a policy-training library: the configuration optimiser
/// only needs to fine-tune an agent for a number of environment steps, switch it
/// between training and evaluation mode, and persist it.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Trains the agent on `env` for `total_timesteps` environment steps.
    ///
    /// Returns a record summarising the run.
    fn learn(&mut self, env: &mut E, total_timesteps: usize) -> Result<Record>;

    /// Save the parameters of the agent to the given path.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given path.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
