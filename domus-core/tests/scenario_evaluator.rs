use anyhow::Result;
use domus_core::{
    error::DomusError,
    record::{Record, RecordValue},
    Act, Env, Evaluator, Info, Obs, Policy, ScenarioEvaluator, Step,
};
use test_log::test;

#[derive(Clone, Debug)]
struct CountObs(usize);

impl Obs for CountObs {
    fn len(&self) -> usize {
        1
    }
}

#[derive(Clone, Debug)]
struct Gain(f32);

impl Act for Gain {
    fn len(&self) -> usize {
        1
    }
}

struct NoInfo;

impl Info for NoInfo {}

/// Scenario `ix` lasts `ix` steps; the reward at step `t` is `gain * t`.
struct CountEnv {
    t: usize,
    len: usize,
}

impl Env for CountEnv {
    type Config = ();
    type Obs = CountObs;
    type Act = Gain;
    type Info = NoInfo;

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { t: 0, len: 1 })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let reward = a.0 * self.t as f32;
        let done = self.t >= self.len;
        let step = Step::new(CountObs(self.t), a.clone(), reward, false, done, NoInfo);
        Ok((step, Record::from_scalar("reward", reward)))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(CountObs(0))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        if ix == 0 {
            return Err(DomusError::ZeroLengthEpisode(ix).into());
        }
        self.len = ix;
        self.reset()
    }
}

struct ConstPolicy(f32);

impl Policy<CountEnv> for ConstPolicy {
    fn sample(&mut self, _obs: &CountObs) -> Gain {
        Gain(self.0)
    }
}

#[test]
fn mean_reward_per_step() -> Result<()> {
    let mut env = CountEnv::build(&(), 0)?;
    // rewards 1, 2, 3, 4 => mean 2.5
    let r = domus_core::episode_mean_reward(&mut env, &mut ConstPolicy(1.0), 4)?;
    assert_eq!(r, 2.5);
    Ok(())
}

#[test]
fn summary_is_average_of_scenario_means() -> Result<()> {
    let mut evaluator = ScenarioEvaluator::<CountEnv>::new(&(), 0, vec![1, 3])?;
    let record = evaluator.evaluate(&mut ConstPolicy(2.0))?;

    // scenario 1: mean 2; scenario 3: rewards 2, 4, 6 => mean 4
    assert_eq!(record.get_scalar("reward_scenario_1")?, 2.0);
    assert_eq!(record.get_scalar("reward_scenario_3")?, 4.0);
    assert_eq!(
        record.get("summary_reward"),
        Some(&RecordValue::Scalar(3.0))
    );
    Ok(())
}

#[test]
fn repeated_evaluation_is_deterministic() -> Result<()> {
    let mut evaluator = ScenarioEvaluator::<CountEnv>::new(&(), 0, (1..=5).collect())?;
    let r1 = evaluator.evaluate(&mut ConstPolicy(0.5))?.get_scalar("summary_reward")?;
    let r2 = evaluator.evaluate(&mut ConstPolicy(0.5))?.get_scalar("summary_reward")?;
    assert_eq!(r1, r2);
    Ok(())
}

#[test]
fn zero_length_episode_fails() -> Result<()> {
    let mut evaluator = ScenarioEvaluator::<CountEnv>::new(&(), 0, vec![2, 0])?;
    let err = evaluator.evaluate(&mut ConstPolicy(1.0)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomusError>(),
        Some(&DomusError::ZeroLengthEpisode(0))
    );
    Ok(())
}

#[test]
fn empty_catalogue_fails() {
    let mut evaluator = ScenarioEvaluator::<CountEnv>::new(&(), 0, vec![]).unwrap();
    assert!(evaluator.evaluate(&mut ConstPolicy(1.0)).is_err());
}
