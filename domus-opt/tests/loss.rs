use anyhow::{bail, Result};
use domus_core::{
    error::DomusError,
    record::{NullRecorder, Record},
    Agent, Configurable, Policy,
};
use domus_gym::{
    CabinAct, CabinControl, CabinObs, CabinSimulator, CabinState, Config, ConfigSet,
    ContinuousAct, DomusContEnv, DomusEnv, DomusLumpedConfig, LumpedCabin, LumpedCabinConfig,
    Scenario, ScenarioTable, SimStep, OBS_DIM,
};
use domus_opt::{configuration_loss, Artifacts, Loss, Pretrained, SEARCHED_FEATURES};
use domus_policy::{MlpAgent, MlpAgentConfig};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};
use tempdir::TempDir;
use test_log::test;

const ENV_ID: &str = "DomusContEnv-v0";

type ContLoss = Loss<ContinuousAct, LumpedCabin, MlpAgent<DomusContEnv>>;

/// Saves an untrained baseline agent where the search looks for it.
fn save_baseline(exp_folder: &Path) -> Result<()> {
    save_baseline_with(exp_folder, MlpAgentConfig::default())
}

fn save_baseline_with(exp_folder: &Path, config: MlpAgentConfig) -> Result<()> {
    let run_dir = exp_folder.join("ppo").join(format!("{}_1", ENV_ID));
    fs::create_dir_all(run_dir.join(ENV_ID))?;
    let config = config.hidden_dims(vec![8]).rollout_len(10);
    let agent = MlpAgent::<DomusContEnv>::build(config);
    agent.save(
        run_dir.join(format!("{}.bin", ENV_ID)),
        run_dir.join(ENV_ID).join("vecnormalize.yaml"),
    )
}

fn loss(exp_folder: &Path) -> Result<ContLoss> {
    let artifacts = Artifacts::locate(exp_folder, "PPO", ENV_ID, "1")?;
    let env_config = DomusLumpedConfig::default().fixed_episode_length(Some(5));
    ContLoss::new(env_config, artifacts, 20, 0, Box::new(NullRecorder {}))
}

#[test]
fn test_configuration_loss_monotonic() -> Result<()> {
    let table = ScenarioTable::bundled()?;
    let none = configuration_loss(&ConfigSet::empty(), &table)?;
    let seat = configuration_loss(&ConfigSet::empty().with(Config::Seat), &table)?;
    let radiant = configuration_loss(&ConfigSet::empty().with(Config::Radiant), &table)?;
    let both = configuration_loss(
        &ConfigSet::empty().with(Config::Radiant).with(Config::Seat),
        &table,
    )?;
    let window = configuration_loss(&ConfigSet::empty().with(Config::WindowHeating), &table)?;

    assert_eq!(none, 0.0);
    assert_eq!(window, 0.0);
    assert!(none < seat && seat < radiant && radiant < both);
    Ok(())
}

#[test]
fn test_candidate_configuration() {
    assert_eq!(SEARCHED_FEATURES[..], Config::ALL[..SEARCHED_FEATURES.len()]);
    let c = ContLoss::configuration(&[1, 0, 1, 0]);
    assert_eq!(
        c,
        ConfigSet::empty()
            .with(Config::Radiant)
            .with(Config::WindowHeating)
    );
}

#[test]
fn test_missing_artifacts() -> Result<()> {
    let dir = TempDir::new("domus_opt")?;
    let missing = dir.path().join("missing");
    for exp_folder in [missing.as_path(), dir.path()] {
        let err = Artifacts::locate(exp_folder, "PPO", ENV_ID, "1").err().unwrap();
        assert!(matches!(
            err.downcast_ref::<DomusError>(),
            Some(DomusError::MissingArtifact(_))
        ));
    }
    Ok(())
}

#[test]
fn test_loss_and_policy_cache() -> Result<()> {
    let dir = TempDir::new("domus_opt")?;
    save_baseline(dir.path())?;
    let mut loss = loss(dir.path())?;
    let x = [1, 1, 0, 0];

    let y = loss.eval(&x)?;
    assert!(y.is_finite());
    assert!(loss.cache().contains(&x));
    let mean1 = loss.cache().get(&x).unwrap().normalizer().mean().to_vec();

    // The cached agent is fine-tuned further instead of the baseline
    loss.eval(&x)?;
    assert_eq!(loss.cache().len(), 1);
    let mean2 = loss.cache().get(&x).unwrap().normalizer().mean().to_vec();
    assert_ne!(mean1, mean2);

    loss.eval(&[0, 0, 0, 0])?;
    assert_eq!(loss.cache().len(), 2);
    Ok(())
}

#[test]
fn test_baseline_with_wrong_obs_dim() -> Result<()> {
    let dir = TempDir::new("domus_opt")?;
    save_baseline_with(dir.path(), MlpAgentConfig::default().obs_dim(OBS_DIM - 1))?;
    let mut loss = loss(dir.path())?;
    assert!(loss.eval(&[0, 0, 0, 0]).is_err());
    assert!(loss.cache().is_empty());
    Ok(())
}

static N_CLOSED: AtomicUsize = AtomicUsize::new(0);

/// Lumped cabin counting how often it is closed.
struct ClosingCabin(LumpedCabin);

impl CabinSimulator for ClosingCabin {
    type Config = LumpedCabinConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self(LumpedCabin::build(config)?))
    }

    fn reset(&mut self, scenario: &Scenario) -> Result<CabinState> {
        self.0.reset(scenario)
    }

    fn step(&mut self, control: &CabinControl) -> Result<SimStep> {
        self.0.step(control)
    }

    fn close(&mut self) {
        N_CLOSED.fetch_add(1, Ordering::SeqCst);
    }
}

type ClosingEnv = DomusEnv<ContinuousAct, ClosingCabin>;

/// Agent whose training always fails.
struct BrokenAgent;

impl Policy<ClosingEnv> for BrokenAgent {
    fn sample(&mut self, _: &CabinObs) -> CabinAct {
        CabinAct(vec![0.0; 7])
    }
}

impl Agent<ClosingEnv> for BrokenAgent {
    fn train(&mut self) {}

    fn eval(&mut self) {}

    fn is_train(&self) -> bool {
        true
    }

    fn learn(&mut self, _: &mut ClosingEnv, _: usize) -> Result<Record> {
        bail!("training diverged")
    }

    fn save_params(&self, _: &Path) -> Result<()> {
        Ok(())
    }

    fn load_params(&mut self, _: &Path) -> Result<()> {
        Ok(())
    }
}

impl Pretrained for BrokenAgent {
    fn load(_: &Path, _: &Path) -> Result<Self> {
        Ok(Self)
    }

    fn dims(&self) -> (usize, usize) {
        (OBS_DIM, 7)
    }
}

#[test]
fn test_training_env_closed_when_learning_fails() -> Result<()> {
    let artifacts = Artifacts {
        model_file: PathBuf::from("model.bin"),
        norm_file: PathBuf::from("vecnormalize.yaml"),
    };
    let mut loss = Loss::<ContinuousAct, ClosingCabin, BrokenAgent>::new(
        DomusLumpedConfig::default(),
        artifacts,
        10,
        0,
        Box::new(NullRecorder {}),
    )?;

    let err = loss.eval(&[1, 0, 0, 0]).unwrap_err();
    assert_eq!(err.to_string(), "training diverged");
    assert_eq!(N_CLOSED.load(Ordering::SeqCst), 1);
    assert!(loss.cache().is_empty());
    Ok(())
}
