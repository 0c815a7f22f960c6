//! Lumped-capacitance cabin model.
use super::{CabinControl, CabinSimulator, CabinState, SimStep};
use crate::scenario::Scenario;
use anyhow::{bail, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

const CP_AIR: f32 = 1005.0;

/// Fresh-air fraction multiplier per fresh-air mode.
const NEW_AIR_MODE_FRACTION: [f32; 4] = [1.0, 0.7, 0.4, 0.1];

/// Configuration of [`LumpedCabin`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LumpedCabinConfig {
    /// Step length in seconds.
    pub dt: f32,

    /// Heat capacity of the cabin air and interior in J/K.
    pub cabin_capacity: f32,

    /// Heat capacity of the windshield in J/K.
    pub windshield_capacity: f32,

    /// Conductance between cabin and ambient through the body in W/K.
    pub ua_body: f32,

    /// Conductance between cabin and windshield in W/K.
    pub ua_windshield: f32,

    /// Conductance between windshield and ambient at standstill in W/K.
    pub ua_windshield_out: f32,

    /// Increase of the outer windshield conductance per km/h.
    pub ua_speed_gain: f32,

    /// Effective glazing areas for the two solar loads in m².
    pub solar_area: [f32; 2],

    /// Air mass flow at the lowest and highest blower level in kg/s.
    pub mass_flow: [f32; 2],

    /// Blower level range mapped onto `mass_flow`.
    pub blower_range: [f32; 2],

    /// Coefficient of performance of the heat pump.
    pub cop: f32,

    /// Heat delivered by one radiant panel in W.
    pub radiant_power: f32,

    /// Heat delivered per seat heater level in W.
    pub seat_power: f32,

    /// Power of the windshield heater at full level in W.
    pub window_heating_power: f32,

    /// Blower electrical power at full flow in W.
    pub blower_power: f32,

    /// Relative humidity the occupants drive the cabin towards.
    pub occupant_rh: f32,

    /// Humidity exchange rate per second at full flow.
    pub rh_rate: f32,
}

impl Default for LumpedCabinConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            cabin_capacity: 150_000.0,
            windshield_capacity: 15_000.0,
            ua_body: 90.0,
            ua_windshield: 40.0,
            ua_windshield_out: 30.0,
            ua_speed_gain: 0.6,
            solar_area: [0.6, 0.8],
            mass_flow: [0.02, 0.12],
            blower_range: [179.0, 400.0],
            cop: 2.5,
            radiant_power: 100.0,
            seat_power: 50.0,
            window_heating_power: 500.0,
            blower_power: 300.0,
            occupant_rh: 0.6,
            rh_rate: 0.02,
        }
    }
}

/// First-order cabin model with an air node, a windshield node and a
/// humidity state.
///
/// It reproduces the qualitative response of a cabin to the HVAC actuators
/// and nothing more.
pub struct LumpedCabin {
    config: LumpedCabinConfig,
    state: Option<CabinState>,
}

impl LumpedCabin {
    fn flow_fraction(&self, blower_level: f32) -> f32 {
        let [lo, hi] = self.config.blower_range;
        ((blower_level - lo) / (hi - lo)).clamp(0.0, 1.0)
    }
}

impl CabinSimulator for LumpedCabin {
    type Config = LumpedCabinConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        if !(config.dt > 0.0) || !(config.cabin_capacity > 0.0) || !(config.windshield_capacity > 0.0)
        {
            bail!("Invalid LumpedCabinConfig: {:?}", config);
        }
        Ok(Self {
            config: config.clone(),
            state: None,
        })
    }

    fn reset(&mut self, sc: &Scenario) -> Result<CabinState> {
        debug!("LumpedCabin::reset(scenario = {})", sc.id);
        let state = CabinState {
            cabin_t: sc.cabin_t,
            cabin_v: sc.cabin_v,
            cabin_rh: sc.cabin_rh,
            windshield_t: 0.5 * (sc.cabin_t + sc.ambient_t),
            ambient_t: sc.ambient_t,
            ambient_rh: sc.ambient_rh,
            solar1: sc.solar1,
            solar2: sc.solar2,
            car_speed: sc.car_speed,
        };
        self.state = Some(state.clone());
        Ok(state)
    }

    fn step(&mut self, u: &CabinControl) -> Result<SimStep> {
        let c = &self.config;
        let s = match self.state.as_ref() {
            Some(s) => s,
            None => bail!("LumpedCabin::step() called before reset()"),
        };

        let flow = self.flow_fraction(u.blower_level);
        let m_dot = c.mass_flow[0] + flow * (c.mass_flow[1] - c.mass_flow[0]);
        let mode = NEW_AIR_MODE_FRACTION[(u.new_air_mode as usize).min(3)];
        let fresh = (1.0 - u.recirc.clamp(0.0, 1.0)) * mode;
        let mix_t = fresh * s.ambient_t + (1.0 - fresh) * s.cabin_t;

        // Heat carried by the supply air, split between cabin and windshield
        let q_hvac = u.hv_heater + c.cop * u.compressor_power;
        let q_air = m_dot * CP_AIR * (mix_t - s.cabin_t) + q_hvac;
        let defrost = u.dist_defrost.clamp(0.0, 1.0);
        let q_air_ws = 0.3 * defrost * q_air.max(0.0);

        let n_radiant = u.radiant.iter().filter(|&&l| l > 0).count() as f32;
        let q_occupant = n_radiant * c.radiant_power + u.seat as f32 * c.seat_power;
        let q_window = u.window_heating.clamp(0.0, 1.0) * c.window_heating_power;

        let q_cabin = q_air - q_air_ws
            + c.ua_body * (s.ambient_t - s.cabin_t)
            + c.ua_windshield * (s.windshield_t - s.cabin_t)
            + c.solar_area[1] * s.solar2
            + q_occupant;
        let ua_out = c.ua_windshield_out + c.ua_speed_gain * s.car_speed;
        let q_ws = c.ua_windshield * (s.cabin_t - s.windshield_t)
            + ua_out * (s.ambient_t - s.windshield_t)
            + c.solar_area[0] * s.solar1
            + q_window
            + q_air_ws;

        let rh_target = fresh * s.ambient_rh + (1.0 - fresh) * c.occupant_rh;
        let rh_rate = c.rh_rate * (0.2 + 0.8 * flow);
        let cabin_rh = s.cabin_rh + c.dt * rh_rate * (rh_target - s.cabin_rh);
        let vent = 1.0 - 0.3 * u.smart_vent.min(1) as f32;

        let state = CabinState {
            cabin_t: s.cabin_t + c.dt * q_cabin / c.cabin_capacity,
            cabin_v: 0.05 + 0.5 * flow * vent,
            cabin_rh: cabin_rh.clamp(0.0, 1.0),
            windshield_t: s.windshield_t + c.dt * q_ws / c.windshield_capacity,
            ..s.clone()
        };
        let power = u.compressor_power
            + u.hv_heater
            + u.fan_power
            + flow * c.blower_power
            + n_radiant * c.radiant_power
            + u.seat as f32 * c.seat_power
            + q_window;
        let terminated = !state.is_finite();
        trace!(
            "LumpedCabin::step(): cabin_t = {}, power = {}",
            state.cabin_t,
            power
        );

        self.state = Some(state.clone());
        Ok(SimStep {
            state,
            power,
            terminated,
        })
    }

    fn close(&mut self) {
        self.state = None;
    }
}
