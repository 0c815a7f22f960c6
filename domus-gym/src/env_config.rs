//! Configuration of [`DomusEnv`](crate::DomusEnv).
use crate::{config::ConfigSet, reward::KELVIN};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`DomusEnv`](crate::DomusEnv).
///
/// `C` is the configuration of the cabin simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomusEnvConfig<C> {
    /// Draws the scenario of every episode at random from the evaluation catalogue.
    pub use_random_scenario: bool,

    /// Replays this scenario on [`Env::reset`](domus_core::Env::reset).
    ///
    /// Ignored if `use_random_scenario` is set. If neither is set, scenarios are
    /// drawn at random.
    pub use_scenario: Option<usize>,

    /// Episode length in steps, overriding the duration of the scenario.
    pub fixed_episode_length: Option<usize>,

    /// Fitted optional features.
    pub configuration: ConfigSet,

    /// Cabin temperature set-point in K.
    pub setpoint: f32,

    /// CSV file of scenarios. The bundled table is used if `None`.
    pub scenarios: Option<PathBuf>,

    /// Simulator configuration.
    pub sim_config: C,
}

impl<C: Default> Default for DomusEnvConfig<C> {
    fn default() -> Self {
        Self {
            use_random_scenario: false,
            use_scenario: None,
            fixed_episode_length: None,
            configuration: ConfigSet::all(),
            setpoint: KELVIN + 22.0,
            scenarios: None,
            sim_config: C::default(),
        }
    }
}

impl<C> DomusEnvConfig<C> {
    /// Sets the random-scenario flag.
    pub fn use_random_scenario(mut self, v: bool) -> Self {
        self.use_random_scenario = v;
        self
    }

    /// Sets the scenario replayed on reset.
    pub fn use_scenario(mut self, id: Option<usize>) -> Self {
        self.use_scenario = id;
        self
    }

    /// Sets a fixed episode length.
    pub fn fixed_episode_length(mut self, n: Option<usize>) -> Self {
        self.fixed_episode_length = n;
        self
    }

    /// Sets the fitted features.
    pub fn configuration(mut self, configuration: ConfigSet) -> Self {
        self.configuration = configuration;
        self
    }

    /// Sets the set-point in K.
    pub fn setpoint(mut self, setpoint: f32) -> Self {
        self.setpoint = setpoint;
        self
    }

    /// Sets the scenario file.
    pub fn scenarios(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenarios = Some(path.into());
        self
    }

    /// Sets the simulator configuration.
    pub fn sim_config(mut self, sim_config: C) -> Self {
        self.sim_config = sim_config;
        self
    }
}

impl<C: Serialize + for<'de> Deserialize<'de>> DomusEnvConfig<C> {
    /// Constructs [`DomusEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DomusEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
