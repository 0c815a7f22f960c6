//! Driving the cabin through the environment must reproduce the actions of
//! driving the simulator directly.
use anyhow::Result;
use domus_core::Env;
use domus_gym::{
    reward::KELVIN, run_reference, ActionStrategy, CabinAct, CabinSimulator, DomusContEnv,
    DomusLumpedConfig, HvacInput, LumpedCabin, LumpedCabinConfig, ScenarioTable, SimpleHvac,
};
use test_log::test;

const N_STEPS: usize = 100;

#[test]
fn test_scenario_30_matches_reference() -> Result<()> {
    let setpoint = KELVIN + 22.0;
    let ctrl = SimpleHvac::default();

    let table = ScenarioTable::bundled()?;
    let mut sim = LumpedCabin::build(&LumpedCabinConfig::default())?;
    let expected = run_reference(&mut sim, &ctrl, table.get(30)?, setpoint, N_STEPS)?;
    assert_eq!(expected.len(), N_STEPS);

    let config = DomusLumpedConfig::default()
        .use_scenario(Some(30))
        .fixed_episode_length(Some(N_STEPS))
        .setpoint(setpoint);
    let mut env = DomusContEnv::build(&config, 0)?;
    let obs_space = env.observation_space();
    let mut obs = env.reset()?;
    let mut actual = Vec::with_capacity(N_STEPS);
    loop {
        assert!(obs_space.contains(&obs.0));
        let phys = ctrl.control(&HvacInput::from_obs(&obs));
        let a = env.action_strategy().assembler().normalize(&phys)?;
        let (step, record) = env.step(&CabinAct(a))?;
        actual.push(record.get_array1("act_phys")?);
        if step.is_done() {
            break;
        }
        obs = step.obs;
    }
    assert_eq!(actual.len(), N_STEPS);

    // Only the normalize/denormalize round trip separates the two traces
    let space = env.action_strategy().physical_space();
    for (t, (x, y)) in expected.iter().zip(actual.iter()).enumerate() {
        for i in 0..x.len() {
            let scale = space.high()[i].abs().max(space.low()[i].abs());
            assert!(
                (x[i] - y[i]).abs() <= 4.0 * f32::EPSILON * scale,
                "step {}, dim {}: {} != {}",
                t,
                i,
                x[i],
                y[i]
            );
        }
    }
    Ok(())
}
