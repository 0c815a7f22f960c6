#![warn(missing_docs)]
//! Cabin-thermal environments of an electric vehicle.
//!
//! [`DomusEnv`] composes an [`ActionStrategy`], which interprets the actions of a
//! policy, and a [`CabinSimulator`], which advances the cabin physics. A policy
//! acts on the HVAC through normalized actions in `[-1, 1]^N`; the
//! [`ActionAssembler`] maps them onto physical actuator values, rounds discrete
//! actuators and forces the actuators of the optional features missing from the
//! [`ConfigSet`] to zero.
//!
//! ```no_run
//! use domus_core::Env;
//! use domus_gym::{CabinAct, DomusContEnv, DomusEnvConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DomusEnvConfig::default().use_scenario(Some(30));
//! let mut env = DomusContEnv::build(&config, 42)?;
//! let _obs = env.reset()?;
//! let (step, _record) = env.step(&CabinAct(vec![0.0; 7]))?;
//! println!("reward = {}", step.reward);
//! # Ok(())
//! # }
//! ```
pub mod act;
pub mod config;
pub mod consumption;
mod ctrl;
mod env;
mod env_config;
mod obs;
pub mod reward;
pub mod scenario;
pub mod sim;
mod space;
mod transform;

pub use act::{
    round_level, ActionAssembler, ActionDim, ActionStrategy, CabinAct, ContinuousAct,
    DiscreteAct, FullAct,
};
pub use config::{Config, ConfigSet};
pub use ctrl::{run_reference, HvacInput, SimpleHvac, SimpleHvacConfig};
pub use env::{DomusEnv, DomusInfo};
pub use env_config::DomusEnvConfig;
pub use obs::{CabinObs, OBS_DIM};
pub use scenario::{Scenario, ScenarioTable, N_UCS};
pub use sim::{CabinControl, CabinSimulator, CabinState, LumpedCabin, LumpedCabinConfig, SimStep};
pub use space::BoxSpace;
pub use transform::{MinMaxTransform, RANGE_TOLERANCE};

/// Environment with the continuous 7-dimensional HVAC action.
pub type DomusContEnv = DomusEnv<ContinuousAct, LumpedCabin>;

/// Environment with the 14-dimensional action over every actuator.
pub type DomusFullEnv = DomusEnv<FullAct, LumpedCabin>;

/// Environment with the discrete HVAC action.
pub type DomusDiscreteEnv = DomusEnv<DiscreteAct, LumpedCabin>;

/// Configuration of the environments simulated by [`LumpedCabin`].
pub type DomusLumpedConfig = DomusEnvConfig<LumpedCabinConfig>;
