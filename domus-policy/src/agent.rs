//! MLP agent.
use crate::{Mat, Mlp, MlpAgentConfig, ObsNormalizer};
use anyhow::{ensure, Result};
use domus_core::{
    error::DomusError,
    record::{Record, RecordValue},
    Agent, Configurable, Env, Policy,
};
use log::{debug, info};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    marker::PhantomData,
    path::Path,
};

/// Success-rule factor applied to the perturbation scale.
const SIGMA_UP: f32 = 1.5;

#[derive(Serialize, Deserialize)]
struct Archive {
    config: MlpAgentConfig,
    mlp: Mlp,
}

/// Deterministic MLP policy over normalised observations.
///
/// Actions are the `tanh` outputs of the network, so they always lie in
/// `[-1, 1]^N`. [`Agent::learn`] fine-tunes the network with a (1+1)
/// evolution strategy: a Gaussian perturbation of the parameters is kept if it
/// scores at least as well as the current parameters on a rollout, and the
/// perturbation scale follows the one-fifth success rule. Observation
/// statistics are updated during training only.
pub struct MlpAgent<E> {
    config: MlpAgentConfig,
    mlp: Mlp,
    normalizer: ObsNormalizer,
    rng: SmallRng,
    sigma: f32,
    train: bool,
    phantom: PhantomData<E>,
}

impl<E> MlpAgent<E> {
    /// Configuration.
    pub fn config(&self) -> &MlpAgentConfig {
        &self.config
    }

    /// The network.
    pub fn mlp(&self) -> &Mlp {
        &self.mlp
    }

    /// Observation statistics.
    pub fn normalizer(&self) -> &ObsNormalizer {
        &self.normalizer
    }

    /// Computes the action for an observation.
    pub fn act(&self, obs: &[f32]) -> Vec<f32> {
        let x: Mat = self.normalizer.normalize(obs).into();
        self.mlp.forward(&x).data
    }

    /// Saves the network to `model_file` and the observation statistics to
    /// `norm_file`.
    pub fn save(&self, model_file: impl AsRef<Path>, norm_file: impl AsRef<Path>) -> Result<()> {
        let archive = Archive {
            config: self.config.clone(),
            mlp: self.mlp.clone(),
        };
        let wtr = BufWriter::new(File::create(model_file.as_ref())?);
        bincode::serialize_into(wtr, &archive)?;
        self.normalizer.save(norm_file)?;
        debug!("Saved model to {:?}", model_file.as_ref());
        Ok(())
    }

    /// Loads an agent saved with [`MlpAgent::save`].
    ///
    /// The agent is in evaluation mode.
    pub fn load(model_file: impl AsRef<Path>, norm_file: impl AsRef<Path>) -> Result<Self> {
        for path in [model_file.as_ref(), norm_file.as_ref()] {
            if !path.exists() {
                return Err(DomusError::MissingArtifact(path.display().to_string()).into());
            }
        }
        let rdr = BufReader::new(File::open(model_file.as_ref())?);
        let archive: Archive = bincode::deserialize_from(rdr)?;
        let normalizer = ObsNormalizer::load(norm_file)?;
        ensure!(
            archive.mlp.in_dim() == archive.config.obs_dim
                && archive.mlp.out_dim() == archive.config.act_dim
                && normalizer.dim() == archive.config.obs_dim,
            "Inconsistent model archive {:?}",
            model_file.as_ref()
        );
        Ok(Self {
            rng: SmallRng::seed_from_u64(archive.config.seed),
            sigma: archive.config.sigma,
            config: archive.config,
            mlp: archive.mlp,
            normalizer,
            train: false,
            phantom: PhantomData,
        })
    }
}

impl<E> MlpAgent<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<Vec<f32>>,
{
    /// Runs the current parameters for at most `budget` steps of one episode.
    ///
    /// Returns the mean reward and the number of steps taken.
    fn rollout(&mut self, env: &mut E, budget: usize) -> Result<(f32, usize)> {
        let mut obs = env.reset()?;
        ensure!(
            obs.as_ref().len() == self.config.obs_dim,
            "Observation has {} dimensions, the agent expects {}",
            obs.as_ref().len(),
            self.config.obs_dim
        );
        let mut total = 0f64;
        let mut n = 0;
        while n < budget {
            if self.train {
                self.normalizer.update(obs.as_ref());
            }
            let act = self.act(obs.as_ref()).into();
            let (step, _) = env.step(&act)?;
            total += step.reward as f64;
            n += 1;
            if step.is_done() {
                break;
            }
            obs = step.obs;
        }
        Ok(((total / n.max(1) as f64) as f32, n))
    }
}

impl<E> Configurable for MlpAgent<E> {
    type Config = MlpAgentConfig;

    fn build(config: Self::Config) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mlp = Mlp::new(&config.layer_dims(), &mut rng);
        Self {
            normalizer: ObsNormalizer::new(config.obs_dim, config.clip_obs),
            sigma: config.sigma,
            config,
            mlp,
            rng,
            train: true,
            phantom: PhantomData,
        }
    }
}

impl<E> Policy<E> for MlpAgent<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<Vec<f32>>,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        self.act(obs.as_ref()).into()
    }
}

impl<E> Agent<E> for MlpAgent<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<Vec<f32>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn learn(&mut self, env: &mut E, total_timesteps: usize) -> Result<Record> {
        let rollout_len = self.config.rollout_len.max(1);
        let mut timesteps = 0;
        let (mut n_candidates, mut n_accepted) = (0usize, 0usize);
        let mut fitness = None;

        while timesteps < total_timesteps {
            let budget = rollout_len.min(total_timesteps - timesteps);
            let parent_fitness = match fitness {
                None => {
                    let (f, n) = self.rollout(env, budget)?;
                    timesteps += n;
                    fitness = Some(f);
                    continue;
                }
                Some(f) => f,
            };

            let parent = self.mlp.params();
            let sigma = self.sigma;
            let child: Vec<f32> = parent
                .iter()
                .map(|p| p + sigma * self.rng.sample::<f32, _>(StandardNormal))
                .collect();
            self.mlp.set_params(&child)?;
            let (f, n) = self.rollout(env, budget)?;
            timesteps += n;
            n_candidates += 1;

            if f >= parent_fitness {
                fitness = Some(f);
                n_accepted += 1;
                self.sigma *= SIGMA_UP;
            } else {
                self.mlp.set_params(&parent)?;
                self.sigma *= SIGMA_UP.powf(-0.25);
            }
        }

        info!(
            "Fine-tuned for {} steps, {}/{} candidates accepted",
            timesteps, n_accepted, n_candidates
        );
        let mut record = Record::from_slice(&[
            ("timesteps", RecordValue::Scalar(timesteps as f32)),
            ("n_candidates", RecordValue::Scalar(n_candidates as f32)),
            ("n_accepted", RecordValue::Scalar(n_accepted as f32)),
            ("sigma", RecordValue::Scalar(self.sigma)),
        ]);
        if let Some(f) = fitness {
            record.insert("fitness", RecordValue::Scalar(f));
        }
        Ok(record)
    }

    /// Save the parameters to `model.bin` and `vecnormalize.yaml` in the given
    /// directory.
    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.save(path.join("model.bin"), path.join("vecnormalize.yaml"))
    }

    /// Load the parameters from `model.bin` and `vecnormalize.yaml` in the given
    /// directory.
    fn load_params(&mut self, path: &Path) -> Result<()> {
        let agent = Self::load(path.join("model.bin"), path.join("vecnormalize.yaml"))?;
        self.config = agent.config;
        self.mlp = agent.mlp;
        self.normalizer = agent.normalizer;
        Ok(())
    }
}
