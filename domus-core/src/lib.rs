#![warn(missing_docs)]
//! Core abstractions of the Domus cabin-thermal gym.
//!
//! The crate defines the interfaces between the three kinds of object that take part
//! in an experiment:
//!
//! * an environment ([`Env`]) wrapping a cabin simulator,
//! * a policy ([`Policy`]) or a trainable policy ([`Agent`]) emitting actions,
//! * an evaluator ([`Evaluator`]) replaying drive-cycle scenarios with a policy.
//!
//! Values produced along the way (rewards, actions, losses) are passed around as
//! [`record::Record`]s.
pub mod error;
pub mod evaluator;
pub mod record;

mod base;
pub use base::{Act, Agent, Configurable, Env, Info, Obs, Policy, Step};
pub use evaluator::{episode_mean_reward, Evaluator, ScenarioEvaluator};
