//! Objective of the configuration search.
use crate::PolicyCache;
use anyhow::{ensure, Result};
use domus_core::{
    error::DomusError,
    record::{AggregateRecorder, Record, RecordValue},
    Agent, Env, Evaluator, Policy, ScenarioEvaluator,
};
use domus_gym::{
    consumption::power_delta,
    reward::{ENERGY_MAX, ENERGY_MIN, ENERGY_WEIGHT},
    ActionStrategy, CabinSimulator, Config, ConfigSet, DomusEnv, DomusEnvConfig, ScenarioTable,
    N_UCS, OBS_DIM,
};
use domus_policy::MlpAgent;
use log::info;
use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

/// Mass of the vehicle without optional features, in kg.
pub const BASE_MASS: f32 = 1300.0;

/// Mass of the radiant panels, in kg.
pub const RADIANT_MASS: f32 = 1.5;

/// Mass of the seat heater, in kg.
pub const SEAT_MASS: f32 = 1.1;

/// Features switched by the bits of a candidate, in bit order.
pub const SEARCHED_FEATURES: [Config; 4] = [
    Config::Radiant,
    Config::Seat,
    Config::WindowHeating,
    Config::NewAirMode,
];

/// An agent that can be restored from pretrained artifacts.
pub trait Pretrained: Sized {
    /// Loads the model and its observation statistics.
    fn load(model_file: &Path, norm_file: &Path) -> Result<Self>;

    /// Observation and action dimensions the agent was trained with.
    fn dims(&self) -> (usize, usize);
}

impl<E> Pretrained for MlpAgent<E> {
    fn load(model_file: &Path, norm_file: &Path) -> Result<Self> {
        MlpAgent::<E>::load(model_file, norm_file)
    }

    fn dims(&self) -> (usize, usize) {
        (self.config().obs_dim, self.config().act_dim)
    }
}

/// Locations of the pretrained baseline agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Artifacts {
    /// Model archive.
    pub model_file: PathBuf,
    /// Observation statistics.
    pub norm_file: PathBuf,
}

impl Artifacts {
    /// Resolves the artifacts of run `run_number` of `algo` on `env_id` in
    /// `exp_folder`:
    ///
    /// * `<exp_folder>/<algo>/<env_id>_<run_number>/<env_id>.bin`
    /// * `<exp_folder>/<algo>/<env_id>_<run_number>/<env_id>/vecnormalize.yaml`
    ///
    /// `algo` is lower-cased. Fails with [`DomusError::MissingArtifact`] if the
    /// experiment folder or a file does not exist.
    pub fn locate(
        exp_folder: impl AsRef<Path>,
        algo: &str,
        env_id: &str,
        run_number: &str,
    ) -> Result<Self> {
        let exp_folder = exp_folder.as_ref();
        if !exp_folder.is_dir() {
            return Err(DomusError::MissingArtifact(exp_folder.display().to_string()).into());
        }
        let run_dir = exp_folder
            .join(algo.to_lowercase())
            .join(format!("{}_{}", env_id, run_number));
        let artifacts = Self {
            model_file: run_dir.join(format!("{}.bin", env_id)),
            norm_file: run_dir.join(env_id).join("vecnormalize.yaml"),
        };
        for path in [&artifacts.model_file, &artifacts.norm_file] {
            if !path.is_file() {
                return Err(DomusError::MissingArtifact(path.display().to_string()).into());
            }
        }
        Ok(artifacts)
    }
}

/// Energy penalty of the mass added by the fitted features.
///
/// The extra traction power is averaged over the evaluation catalogue
/// `1..=N_UCS`, weighted by scenario duration and divided by the duration of
/// the whole table, then normalised like the energy term of the reward.
pub fn configuration_loss(configuration: &ConfigSet, table: &ScenarioTable) -> Result<f32> {
    let mut mass = 0.0;
    if configuration.contains(Config::Radiant) {
        mass += RADIANT_MASS;
    }
    if configuration.contains(Config::Seat) {
        mass += SEAT_MASS;
    }

    let mut energy = 0.0;
    for id in 1..=N_UCS {
        let sc = table.get(id)?;
        energy += power_delta(sc.car_speed, BASE_MASS, mass) * sc.time;
    }
    let p = energy / table.total_time();
    Ok(p / (ENERGY_MAX - ENERGY_MIN) * ENERGY_WEIGHT)
}

/// Mean over `scenarios` of the per-step reward of `policy`.
pub fn summarise<E, P>(
    config: &E::Config,
    seed: i64,
    scenarios: Vec<usize>,
    policy: &mut P,
) -> Result<f32>
where
    E: Env,
    P: Policy<E>,
{
    let mut evaluator = ScenarioEvaluator::<E>::new(config, seed, scenarios)?;
    let record = evaluator.evaluate(policy)?;
    let mut env = evaluator.into_env();
    env.close();
    Ok(record.get_scalar("summary_reward")?)
}

/// Objective of the configuration search.
///
/// A candidate is a bit vector over [`SEARCHED_FEATURES`]. Its loss is the
/// negated aggregate score of an agent fine-tuned for the candidate cabin plus
/// the [`configuration_loss`] of the candidate. Fine-tuned agents are kept in a
/// [`PolicyCache`] and reused when a candidate comes back.
pub struct Loss<A, S, P>
where
    A: ActionStrategy,
    S: CabinSimulator,
{
    env_config: DomusEnvConfig<S::Config>,
    artifacts: Artifacts,
    timesteps: usize,
    seed: i64,
    table: ScenarioTable,
    cache: PolicyCache<P>,
    recorder: Box<dyn AggregateRecorder>,
    n_evals: i64,
    phantom: PhantomData<A>,
}

impl<A, S, P> Loss<A, S, P>
where
    A: ActionStrategy,
    S: CabinSimulator,
    P: Agent<DomusEnv<A, S>> + Pretrained,
{
    /// Constructs the objective.
    ///
    /// `env_config` is the base configuration of the training and evaluation
    /// environments; its features and scenario selection are overridden per
    /// candidate.
    pub fn new(
        env_config: DomusEnvConfig<S::Config>,
        artifacts: Artifacts,
        timesteps: usize,
        seed: i64,
        recorder: Box<dyn AggregateRecorder>,
    ) -> Result<Self> {
        let table = match &env_config.scenarios {
            Some(path) => ScenarioTable::from_path(path)?,
            None => ScenarioTable::bundled()?,
        };
        Ok(Self {
            env_config,
            artifacts,
            timesteps,
            seed,
            table,
            cache: PolicyCache::new(),
            recorder,
            n_evals: 0,
            phantom: PhantomData,
        })
    }

    /// Fine-tuned agents.
    pub fn cache(&self) -> &PolicyCache<P> {
        &self.cache
    }

    /// Features fitted for a candidate.
    ///
    /// [`SEARCHED_FEATURES`] is a prefix of [`Config::ALL`], so bit `i` of the
    /// candidate maps to the `i`-th feature of both.
    pub fn configuration(x: &[i64]) -> ConfigSet {
        ConfigSet::from_bits(&x[..x.len().min(SEARCHED_FEATURES.len())])
    }

    fn baseline(&self, configuration: &ConfigSet) -> Result<P> {
        let agent = P::load(&self.artifacts.model_file, &self.artifacts.norm_file)?;
        let expected = (OBS_DIM, A::build(configuration)?.action_space().len());
        ensure!(
            agent.dims() == expected,
            "Baseline {:?} has (obs, act) dimensions {:?}, the environment has {:?}",
            self.artifacts.model_file,
            agent.dims(),
            expected
        );
        Ok(agent)
    }

    fn fine_tune(&self, agent: &mut P, configuration: &ConfigSet) -> Result<Record> {
        let config = self
            .env_config
            .clone()
            .configuration(configuration.clone())
            .use_random_scenario(true);
        let mut env = DomusEnv::<A, S>::build(&config, self.seed)?;
        agent.train();
        let res = agent.learn(&mut env, self.timesteps);
        env.close();
        res
    }

    /// Evaluates a candidate.
    pub fn eval(&mut self, x: &[i64]) -> Result<f64> {
        let configuration = Self::configuration(x);
        let mut agent = match self.cache.take(x) {
            Some(agent) => agent,
            None => self.baseline(&configuration)?,
        };

        let mut record = self.fine_tune(&mut agent, &configuration)?;

        agent.eval();
        let config = self
            .env_config
            .clone()
            .configuration(configuration.clone())
            .use_random_scenario(false);
        let scenarios = (1..=N_UCS).collect();
        let score = summarise::<DomusEnv<A, S>, _>(&config, self.seed, scenarios, &mut agent)?;
        let penalty = configuration_loss(&configuration, &self.table)?;
        let loss = -score + penalty;
        info!(
            "Candidate {:?}: score = {}, configuration loss = {}, loss = {}",
            x, score, penalty, loss
        );

        record.insert("score", RecordValue::Scalar(score));
        record.insert("configuration_loss", RecordValue::Scalar(penalty));
        record.insert("loss", RecordValue::Scalar(loss));
        self.recorder.store(record);
        self.n_evals += 1;
        self.recorder.flush(self.n_evals);

        self.cache.insert(x, agent);
        Ok(loss as f64)
    }
}
