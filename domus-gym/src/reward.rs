//! Comfort and energy terms of the reward.

/// Offset between Celsius and Kelvin.
pub const KELVIN: f32 = 273.15;

/// Lower bound of the HVAC power used to normalise the energy term, in W.
pub const ENERGY_MIN: f32 = 0.0;

/// Upper bound of the HVAC power used to normalise the energy term, in W.
pub const ENERGY_MAX: f32 = 10_000.0;

/// Weight of the energy term against the comfort term.
pub const ENERGY_WEIGHT: f32 = 0.25;

/// Set-point deviation in K at which the comfort term saturates.
pub const COMFORT_SPAN: f32 = 10.0;

/// Comfort term in `[-1, 0]`, zero at the set-point.
pub fn comfort(cabin_t: f32, setpoint: f32) -> f32 {
    -((cabin_t - setpoint).abs() / COMFORT_SPAN).min(1.0)
}

/// HVAC power mapped to `[0, 1]`.
pub fn energy_norm(power: f32) -> f32 {
    ((power - ENERGY_MIN) / (ENERGY_MAX - ENERGY_MIN)).clamp(0.0, 1.0)
}

/// Per-step reward `(1 - w) comfort - w energy`.
pub fn reward(cabin_t: f32, setpoint: f32, power: f32) -> f32 {
    (1.0 - ENERGY_WEIGHT) * comfort(cabin_t, setpoint) - ENERGY_WEIGHT * energy_norm(power)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_terms() {
        let sp = KELVIN + 22.0;
        assert_eq!(reward(sp, sp, 0.0), 0.0);
        assert_eq!(comfort(sp - 20.0, sp), -1.0);
        assert_eq!(energy_norm(20_000.0), 1.0);
        assert!(reward(sp - 1.0, sp, 0.0) > reward(sp - 2.0, sp, 0.0));
        assert!(reward(sp, sp, 100.0) > reward(sp, sp, 1000.0));
    }
}
