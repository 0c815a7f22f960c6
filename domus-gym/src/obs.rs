//! Observation of the cabin environments.
use crate::{reward::KELVIN, sim::CabinState, space::BoxSpace};
use domus_core::Obs;

/// Number of observation dimensions.
pub const OBS_DIM: usize = 10;

/// Lowest temperature of the observation space, in K.
pub const OBS_T_MIN: f32 = KELVIN - 60.0;

/// Highest temperature of the observation space, in K.
pub const OBS_T_MAX: f32 = KELVIN + 120.0;

/// Highest air velocity of the observation space, in m/s.
const OBS_V_MAX: f32 = 5.0;

/// Highest solar load of the observation space, in W/m².
const OBS_SOLAR_MAX: f32 = 1500.0;

/// Highest vehicle speed of the observation space, in km/h.
const OBS_SPEED_MAX: f32 = 250.0;

/// Observation
/// `[cabin_t, cabin_v, cabin_rh, windshield_t, ambient_t, ambient_rh, solar1, solar2, car_speed, setpoint]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CabinObs(pub Vec<f32>);

impl CabinObs {
    /// Index of the cabin temperature.
    pub const CABIN_T: usize = 0;
    /// Index of the cabin relative humidity.
    pub const CABIN_RH: usize = 2;
    /// Index of the windshield temperature.
    pub const WINDSHIELD_T: usize = 3;
    /// Index of the ambient temperature.
    pub const AMBIENT_T: usize = 4;
    /// Index of the set-point.
    pub const SETPOINT: usize = 9;

    /// Builds the observation of a cabin state.
    pub fn new(s: &CabinState, setpoint: f32) -> Self {
        Self(vec![
            s.cabin_t,
            s.cabin_v,
            s.cabin_rh,
            s.windshield_t,
            s.ambient_t,
            s.ambient_rh,
            s.solar1,
            s.solar2,
            s.car_speed,
            setpoint,
        ])
    }

    /// Declared bounds of the observation.
    pub fn space() -> BoxSpace {
        let (t0, t1) = (OBS_T_MIN, OBS_T_MAX);
        BoxSpace::new(
            vec![t0, 0.0, 0.0, t0, t0, 0.0, 0.0, 0.0, 0.0, t0],
            vec![
                t1,
                OBS_V_MAX,
                1.0,
                t1,
                t1,
                1.0,
                OBS_SOLAR_MAX,
                OBS_SOLAR_MAX,
                OBS_SPEED_MAX,
                t1,
            ],
        )
    }
}

impl Obs for CabinObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<[f32]> for CabinObs {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for CabinObs {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}
