//! Rule-based HVAC controller.
use crate::{
    act::{BLOWER_MAX, BLOWER_MIN},
    obs::CabinObs,
    scenario::Scenario,
    sim::{CabinControl, CabinSimulator, CabinState},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Measurements read by [`SimpleHvac`].
#[derive(Clone, Debug, PartialEq)]
pub struct HvacInput {
    /// Cabin air temperature in K.
    pub cabin_t: f32,
    /// Cabin relative humidity.
    pub cabin_rh: f32,
    /// Windshield temperature in K.
    pub windshield_t: f32,
    /// Ambient temperature in K.
    pub ambient_t: f32,
    /// Set-point in K.
    pub setpoint: f32,
}

impl HvacInput {
    /// Reads the input from a simulator state.
    pub fn from_state(s: &CabinState, setpoint: f32) -> Self {
        Self {
            cabin_t: s.cabin_t,
            cabin_rh: s.cabin_rh,
            windshield_t: s.windshield_t,
            ambient_t: s.ambient_t,
            setpoint,
        }
    }

    /// Reads the input from an environment observation.
    pub fn from_obs(obs: &CabinObs) -> Self {
        let o = &obs.0;
        Self {
            cabin_t: o[CabinObs::CABIN_T],
            cabin_rh: o[CabinObs::CABIN_RH],
            windshield_t: o[CabinObs::WINDSHIELD_T],
            ambient_t: o[CabinObs::AMBIENT_T],
            setpoint: o[CabinObs::SETPOINT],
        }
    }
}

/// Gains of [`SimpleHvac`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleHvacConfig {
    /// Deviation below the set-point, in K, at which the heat pump runs at full power.
    pub heat_span: f32,
    /// Deviation below the set-point, in K, at which the high-voltage heater starts.
    pub heater_offset: f32,
    /// Relative humidity above which the windshield is defogged.
    pub rh_limit: f32,
}

impl Default for SimpleHvacConfig {
    fn default() -> Self {
        Self {
            heat_span: 5.0,
            heater_offset: 2.0,
            rh_limit: 0.6,
        }
    }
}

/// Proportional set-point controller producing the 7-dimensional HVAC vector
/// `[blower_level, compressor_power, hv_heater, fan_power, recirc, dist_defrost, window_heating]`.
///
/// The output is piecewise linear in the input and always within the physical
/// bounds of [`ContinuousAct`](crate::ContinuousAct).
#[derive(Clone, Debug, Default)]
pub struct SimpleHvac {
    config: SimpleHvacConfig,
}

impl SimpleHvac {
    /// Builds the controller.
    pub fn new(config: SimpleHvacConfig) -> Self {
        Self { config }
    }

    /// Computes the physical HVAC action.
    pub fn control(&self, x: &HvacInput) -> Vec<f32> {
        let c = &self.config;
        let err = x.setpoint - x.cabin_t;
        let heat = (err / c.heat_span).clamp(0.0, 1.0);
        let cool = (-err / c.heat_span).clamp(0.0, 1.0);
        let backup = ((err - c.heater_offset) / c.heat_span).clamp(0.0, 1.0);
        let humid = ((x.cabin_rh - c.rh_limit) * 5.0).clamp(0.0, 1.0);
        let fog = ((x.cabin_t - x.windshield_t) / 20.0).clamp(0.0, 1.0);

        let blower = BLOWER_MIN + (BLOWER_MAX - BLOWER_MIN) * (0.3 + 0.7 * heat.max(cool));
        let compressor = 3000.0 * heat.max(cool);
        let fan = 400.0 * heat.max(cool);
        let recirc = (0.7 * heat - humid).clamp(0.0, 1.0);
        let defrost = (0.2 + 0.5 * humid + 0.3 * fog).clamp(0.0, 1.0);

        vec![
            blower.clamp(BLOWER_MIN, BLOWER_MAX),
            compressor,
            6000.0 * backup,
            fan,
            recirc,
            defrost,
            humid,
        ]
    }
}

/// Drives a simulator directly with [`SimpleHvac`] for `n` steps of a scenario.
///
/// Returns the physical actions applied at every step.
pub fn run_reference<S: CabinSimulator>(
    sim: &mut S,
    ctrl: &SimpleHvac,
    scenario: &Scenario,
    setpoint: f32,
    n: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut state = sim.reset(scenario)?;
    let mut trace = Vec::with_capacity(n);
    for _ in 0..n {
        let a = ctrl.control(&HvacInput::from_state(&state, setpoint));
        let step = sim.step(&CabinControl::hvac(&a))?;
        trace.push(a);
        state = step.state;
        if step.terminated {
            break;
        }
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::KELVIN;

    fn input(cabin_t: f32) -> HvacInput {
        HvacInput {
            cabin_t,
            cabin_rh: 0.5,
            windshield_t: cabin_t,
            ambient_t: KELVIN,
            setpoint: KELVIN + 22.0,
        }
    }

    #[test]
    fn test_heats_when_cold() {
        let ctrl = SimpleHvac::default();
        let cold = ctrl.control(&input(KELVIN + 10.0));
        let warm = ctrl.control(&input(KELVIN + 21.0));
        assert_eq!(cold[1], 3000.0);
        assert_eq!(cold[2], 6000.0);
        assert!(warm[1] < cold[1]);
        assert_eq!(warm[2], 0.0);
    }
}
