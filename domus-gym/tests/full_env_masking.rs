//! A feature that is not fitted must have no effect on the cabin, whatever the
//! policy requests on its action dimensions.
use anyhow::Result;
use domus_core::Env;
use domus_gym::{CabinAct, CabinObs, Config, ConfigSet, DomusFullEnv, DomusLumpedConfig};
use test_log::test;

fn gated_dims(c: Config) -> Vec<usize> {
    match c {
        Config::NewAirMode => vec![0],
        Config::Radiant => vec![1, 2, 3, 4],
        Config::Seat => vec![5],
        Config::SmartVent => vec![6],
        Config::WindowHeating => vec![7],
    }
}

fn one_step(configuration: &ConfigSet, a: Vec<f32>) -> Result<(CabinObs, Vec<f32>)> {
    let config = DomusLumpedConfig::default()
        .use_scenario(Some(30))
        .configuration(configuration.clone());
    let mut env = DomusFullEnv::build(&config, 0)?;
    env.reset()?;
    let (step, record) = env.step(&CabinAct(a))?;
    Ok((step.obs, record.get_array1("act_phys")?))
}

/// Two actions that only differ on the dimensions gated by `c`.
fn actions(c: Config) -> (Vec<f32>, Vec<f32>) {
    let a1 = vec![0.0; 14];
    let mut a2 = a1.clone();
    for i in gated_dims(c) {
        a2[i] = -1.0;
    }
    (a1, a2)
}

#[test]
fn test_disabled_feature_has_no_effect() -> Result<()> {
    for c in Config::ALL {
        let configuration = ConfigSet::all().without(c);
        let (a1, a2) = actions(c);
        let (obs1, phys1) = one_step(&configuration, a1)?;
        let (obs2, phys2) = one_step(&configuration, a2)?;
        assert_eq!(obs1, obs2, "feature {}", c);
        assert_eq!(phys1, phys2, "feature {}", c);
        for i in gated_dims(c) {
            assert_eq!(phys1[i], 0.0);
        }
    }
    Ok(())
}

#[test]
fn test_enabled_feature_has_effect() -> Result<()> {
    for c in Config::ALL {
        let configuration = ConfigSet::all();
        let (a1, a2) = actions(c);
        let (obs1, _) = one_step(&configuration, a1)?;
        let (obs2, _) = one_step(&configuration, a2)?;
        assert_ne!(obs1, obs2, "feature {}", c);
    }
    Ok(())
}

#[test]
fn test_discrete_dims_are_levels() -> Result<()> {
    let (_, phys) = one_step(&ConfigSet::all(), vec![0.3; 14])?;
    for x in &phys[..8] {
        assert_eq!(x.fract(), 0.0);
    }
    assert_eq!(phys[0], 2.0);
    assert_eq!(phys[5], 1.0);
    Ok(())
}
