//! Scenario replay evaluation.
//!
//! A policy is scored by replaying a fixed catalogue of drive-cycle scenarios.
//! Each scenario contributes its mean per-step reward and the summary score is
//! the average of these means over the catalogue.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use log::{debug, trace};

/// Runs one episode of scenario `ix` and returns the mean reward per step.
///
/// The episode ends when the environment reports termination or truncation.
/// Environments reject an episode that would have no step at all with
/// [`DomusError::ZeroLengthEpisode`] when resetting, so the mean is always taken
/// over at least one step.
///
/// [`DomusError::ZeroLengthEpisode`]: crate::error::DomusError::ZeroLengthEpisode
pub fn episode_mean_reward<E, P>(env: &mut E, policy: &mut P, ix: usize) -> Result<f32>
where
    E: Env,
    P: Policy<E>,
{
    let mut prev_obs = env.reset_with_index(ix)?;
    let mut total = 0f64;
    let mut count = 0usize;

    loop {
        let act = policy.sample(&prev_obs);
        let (step, _) = env.step(&act)?;
        total += step.reward as f64;
        count += 1;
        if step.is_done() {
            break;
        }
        prev_obs = step.obs;
    }

    trace!("scenario {}: {} steps, total reward {}", ix, count, total);

    Ok((total / count as f64) as f32)
}

/// Evaluates a policy on a catalogue of scenarios.
///
/// The returned [`Record`] has the summary score under `summary_reward` and the
/// per-scenario mean rewards under `reward_scenario_<id>`.
///
/// # Examples
///
/// ```ignore
/// let config = DomusEnvConfig::default();
/// let mut evaluator = ScenarioEvaluator::<Env>::new(&config, 0, (1..=28).collect())?;
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("summary = {}", record.get_scalar("summary_reward")?);
/// ```
pub struct ScenarioEvaluator<E: Env> {
    /// Ids of the scenarios to replay.
    scenarios: Vec<usize>,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> ScenarioEvaluator<E> {
    /// Constructs a new [`ScenarioEvaluator`].
    ///
    /// * `config` - Configuration of the environment
    /// * `seed` - Random seed for environment initialization
    /// * `scenarios` - Ids of the scenarios, each replayed once per evaluation
    pub fn new(config: &E::Config, seed: i64, scenarios: Vec<usize>) -> Result<Self> {
        Ok(Self::from_env(E::build(config, seed)?, scenarios))
    }

    /// Constructs the evaluator on an existing environment.
    pub fn from_env(env: E, scenarios: Vec<usize>) -> Self {
        Self { scenarios, env }
    }

    /// Ids of the evaluated scenarios.
    pub fn scenarios(&self) -> &[usize] {
        &self.scenarios
    }

    /// Consumes the evaluator and returns the environment.
    pub fn into_env(self) -> E {
        self.env
    }
}

impl<E: Env> Evaluator<E> for ScenarioEvaluator<E> {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        if self.scenarios.is_empty() {
            anyhow::bail!("no scenario to evaluate");
        }

        let mut record = Record::empty();
        let mut sum = 0f64;

        for &ix in self.scenarios.iter() {
            let r = episode_mean_reward(&mut self.env, policy, ix)?;
            debug!("scenario {}: mean reward {}", ix, r);
            record.insert(format!("reward_scenario_{}", ix), RecordValue::Scalar(r));
            sum += r as f64;
        }

        let summary = (sum / self.scenarios.len() as f64) as f32;
        record.insert("summary_reward", RecordValue::Scalar(summary));

        Ok(record)
    }
}
