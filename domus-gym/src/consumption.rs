//! Traction power of the vehicle.
//!
//! Used to price the extra mass of optional cabin features.

/// Rolling resistance coefficient.
pub const C_RR: f32 = 0.01;

/// Gravitational acceleration in m/s².
pub const G: f32 = 9.81;

/// Air density in kg/m³.
pub const RHO_AIR: f32 = 1.2;

/// Drag area `c_d A` in m².
pub const CD_A: f32 = 0.6;

/// Traction power in W at constant `speed` (km/h) for a vehicle of `mass` kg.
pub fn drive_power(speed: f32, mass: f32) -> f32 {
    let v = speed / 3.6;
    C_RR * mass * G * v + 0.5 * RHO_AIR * CD_A * v * v * v
}

/// Extra traction power in W caused by adding `mass_delta` kg to a vehicle of
/// `base_mass` kg.
pub fn power_delta(speed: f32, base_mass: f32, mass_delta: f32) -> f32 {
    drive_power(speed, base_mass + mass_delta) - drive_power(speed, base_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_delta() {
        assert_eq!(power_delta(50.0, 1300.0, 0.0), 0.0);
        assert_eq!(power_delta(0.0, 1300.0, 10.0), 0.0);
        let a = power_delta(50.0, 1300.0, 1.1);
        let b = power_delta(50.0, 1300.0, 2.6);
        assert!(0.0 < a && a < b);
        assert!(drive_power(100.0, 1300.0) > drive_power(50.0, 1300.0));
    }
}
