//! Cabin-thermal simulator interface.
mod lumped;
use crate::scenario::Scenario;
use anyhow::Result;
pub use lumped::{LumpedCabin, LumpedCabinConfig};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Actuator commands applied to the cabin for one simulation step.
///
/// Discrete actuators carry level indices; `radiant` holds one on/off level per
/// panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CabinControl {
    /// Blower level in controller units.
    pub blower_level: f32,
    /// Electrical power of the heat-pump compressor in W.
    pub compressor_power: f32,
    /// Electrical power of the high-voltage air heater in W.
    pub hv_heater: f32,
    /// Electrical power of the front-end fan in W.
    pub fan_power: f32,
    /// Recirculation fraction in `[0, 1]`.
    pub recirc: f32,
    /// Fraction of the supply air routed to the windshield.
    pub dist_defrost: f32,
    /// Windshield heater level.
    pub window_heating: f32,
    /// Fresh-air mode in `0..=3`.
    pub new_air_mode: u8,
    /// Radiant panel levels.
    pub radiant: [u8; 4],
    /// Seat heater level in `0..=2`.
    pub seat: u8,
    /// Smart vent level.
    pub smart_vent: u8,
}

impl CabinControl {
    /// Builds a control from the 7-dimensional HVAC vector
    /// `[blower_level, compressor_power, hv_heater, fan_power, recirc, dist_defrost, window_heating]`.
    ///
    /// Optional features are left off.
    pub fn hvac(phys: &[f32]) -> Self {
        let at = |i: usize| phys.get(i).copied().unwrap_or(0.0);
        Self {
            blower_level: at(0),
            compressor_power: at(1),
            hv_heater: at(2),
            fan_power: at(3),
            recirc: at(4),
            dist_defrost: at(5),
            window_heating: at(6),
            ..Default::default()
        }
    }
}

/// Physical state of the cabin and its surroundings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CabinState {
    /// Cabin air temperature in K.
    pub cabin_t: f32,
    /// Cabin air velocity in m/s.
    pub cabin_v: f32,
    /// Cabin relative humidity.
    pub cabin_rh: f32,
    /// Inner windshield temperature in K.
    pub windshield_t: f32,
    /// Ambient temperature in K.
    pub ambient_t: f32,
    /// Ambient relative humidity.
    pub ambient_rh: f32,
    /// Solar load through the windshield in W/m².
    pub solar1: f32,
    /// Solar load through the side windows in W/m².
    pub solar2: f32,
    /// Vehicle speed in km/h.
    pub car_speed: f32,
}

impl CabinState {
    /// Returns `true` if every field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.cabin_t,
            self.cabin_v,
            self.cabin_rh,
            self.windshield_t,
            self.ambient_t,
            self.ambient_rh,
            self.solar1,
            self.solar2,
            self.car_speed,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Outcome of one simulator step.
#[derive(Clone, Debug)]
pub struct SimStep {
    /// State after the step.
    pub state: CabinState,
    /// Total electrical power drawn by the HVAC system in W.
    pub power: f32,
    /// `true` if the simulation cannot continue.
    pub terminated: bool,
}

/// A cabin-thermal simulator advanced in fixed one-second steps.
pub trait CabinSimulator {
    /// Configuration.
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Builds the simulator.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Initialises the cabin from the initial conditions of a scenario.
    fn reset(&mut self, scenario: &Scenario) -> Result<CabinState>;

    /// Advances the simulation by one step.
    fn step(&mut self, control: &CabinControl) -> Result<SimStep>;

    /// Releases resources held by the simulator.
    fn close(&mut self) {}
}
