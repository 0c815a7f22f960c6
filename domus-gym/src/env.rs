//! Cabin-thermal environment.
use crate::{
    act::{ActionStrategy, CabinAct},
    config::ConfigSet,
    obs::{CabinObs, OBS_T_MAX, OBS_T_MIN},
    reward,
    scenario::{Scenario, ScenarioTable, N_UCS},
    sim::{CabinSimulator, CabinState},
    space::BoxSpace,
    DomusEnvConfig,
};
use anyhow::{bail, ensure, Result};
use domus_core::{
    error::DomusError,
    record::{Record, RecordValue},
    Env, Info, Step,
};
use log::{debug, info, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Information given at every step.
#[derive(Clone, Debug)]
pub struct DomusInfo {
    /// Id of the scenario being replayed.
    pub scenario: usize,
    /// HVAC power in W.
    pub power: f32,
    /// Comfort term of the reward.
    pub comfort: f32,
    /// Number of steps taken in the episode.
    pub step: usize,
}

impl Info for DomusInfo {}

struct Episode {
    scenario: Scenario,
    length: usize,
    step: usize,
}

/// A cabin whose HVAC is controlled through actions interpreted by `A` and
/// simulated by `S`.
///
/// One step is one simulated second. Episodes are truncated after the duration
/// of the scenario, or after
/// [`fixed_episode_length`](DomusEnvConfig::fixed_episode_length) steps.
pub struct DomusEnv<A, S>
where
    A: ActionStrategy,
    S: CabinSimulator,
{
    config: DomusEnvConfig<S::Config>,
    action: A,
    sim: S,
    table: ScenarioTable,
    rng: SmallRng,
    episode: Option<Episode>,
}

impl<A, S> DomusEnv<A, S>
where
    A: ActionStrategy,
    S: CabinSimulator,
{
    /// The action strategy.
    pub fn action_strategy(&self) -> &A {
        &self.action
    }

    /// The space of actions accepted by [`Env::step`].
    pub fn action_space(&self) -> BoxSpace {
        self.action.action_space()
    }

    /// The space of observations returned by [`Env::reset`] and [`Env::step`].
    pub fn observation_space(&self) -> BoxSpace {
        CabinObs::space()
    }

    /// The fitted features.
    pub fn configuration(&self) -> &ConfigSet {
        &self.config.configuration
    }

    /// The scenario table.
    pub fn scenarios(&self) -> &ScenarioTable {
        &self.table
    }

    /// Id of the scenario of the current episode.
    pub fn scenario_id(&self) -> Option<usize> {
        self.episode.as_ref().map(|e| e.scenario.id)
    }

    /// Length of the current episode.
    pub fn episode_length(&self) -> Option<usize> {
        self.episode.as_ref().map(|e| e.length)
    }

    fn obs(&self, state: &CabinState) -> CabinObs {
        CabinObs::new(state, self.config.setpoint)
    }
}

impl<A, S> Env for DomusEnv<A, S>
where
    A: ActionStrategy,
    S: CabinSimulator,
{
    type Config = DomusEnvConfig<S::Config>;
    type Obs = CabinObs;
    type Act = CabinAct;
    type Info = DomusInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let table = match &config.scenarios {
            Some(path) => ScenarioTable::from_path(path)?,
            None => ScenarioTable::bundled()?,
        };
        ensure!(
            (OBS_T_MIN..=OBS_T_MAX).contains(&config.setpoint),
            "Set-point {} K is outside [{}, {}]",
            config.setpoint,
            OBS_T_MIN,
            OBS_T_MAX
        );
        if let Some(id) = config.use_scenario {
            table.get(id)?;
        }
        info!(
            "Build DomusEnv with configuration {:?}",
            config.configuration.iter().collect::<Vec<_>>()
        );
        Ok(Self {
            config: config.clone(),
            action: A::build(&config.configuration)?,
            sim: S::build(&config.sim_config)?,
            table,
            rng: SmallRng::seed_from_u64(seed as u64),
            episode: None,
        })
    }

    fn reset(&mut self) -> Result<CabinObs> {
        let id = match (self.config.use_random_scenario, self.config.use_scenario) {
            (false, Some(id)) => id,
            _ => self.rng.gen_range(1..=N_UCS),
        };
        self.reset_with_index(id)
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<CabinObs> {
        let scenario = self.table.get(ix)?.clone();
        let length = self
            .config
            .fixed_episode_length
            .unwrap_or_else(|| scenario.episode_length());
        if length == 0 {
            return Err(DomusError::ZeroLengthEpisode(ix).into());
        }
        debug!("DomusEnv::reset_with_index({}), length = {}", ix, length);

        let state = self.sim.reset(&scenario)?;
        self.episode = Some(Episode {
            scenario,
            length,
            step: 0,
        });
        Ok(self.obs(&state))
    }

    fn step(&mut self, a: &CabinAct) -> Result<(Step<Self>, Record)> {
        let phys = self.action.convert_action(&a.0)?;
        let control = self.action.control(&phys);
        let (id, step, length) = match self.episode.as_mut() {
            Some(e) => {
                e.step += 1;
                (e.scenario.id, e.step, e.length)
            }
            None => bail!("DomusEnv::step() called before reset()"),
        };

        let sim_step = self.sim.step(&control)?;
        let setpoint = self.config.setpoint;
        let cabin_t = sim_step.state.cabin_t;
        let reward = reward::reward(cabin_t, setpoint, sim_step.power);
        let comfort = reward::comfort(cabin_t, setpoint);
        trace!(
            "DomusEnv::step(): scenario = {}, step = {}, cabin_t = {}, reward = {}",
            id,
            step,
            cabin_t,
            reward
        );

        let mut record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(reward)),
            ("power", RecordValue::Scalar(sim_step.power)),
            ("cabin_t", RecordValue::Scalar(cabin_t)),
        ]);
        record.insert("act_norm", RecordValue::Array1(a.0.clone()));
        record.insert("act_phys", RecordValue::Array1(phys));

        let info = DomusInfo {
            scenario: id,
            power: sim_step.power,
            comfort,
            step,
        };
        let obs = self.obs(&sim_step.state);
        let step = Step::new(
            obs,
            a.clone(),
            reward,
            sim_step.terminated,
            step >= length,
            info,
        );
        Ok((step, record))
    }

    fn close(&mut self) {
        debug!("DomusEnv::close()");
        self.episode = None;
        self.sim.close();
    }
}
