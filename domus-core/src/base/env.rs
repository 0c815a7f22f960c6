//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// An action outside of the action space is an error, not something the
    /// environment tries to repair.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way by the implementation. Cabin
    /// environments interpret it as the id of the drive-cycle scenario to replay,
    /// which is what [`ScenarioEvaluator`] relies on.
    ///
    /// [`ScenarioEvaluator`]: crate::ScenarioEvaluator
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// Releases resources held by the environment.
    ///
    /// Called after a training run whether or not the run succeeded.
    fn close(&mut self) {}
}
