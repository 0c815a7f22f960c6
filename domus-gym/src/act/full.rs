//! Action over every actuator of the cabin.
use super::{ActionAssembler, ActionDim, ActionStrategy, BLOWER_MAX, BLOWER_MIN};
use crate::{
    config::{Config, ConfigSet},
    sim::CabinControl,
    space::BoxSpace,
};
use anyhow::Result;

/// 14-dimensional action covering the HVAC and every optional feature.
///
/// | index | actuator | values | feature |
/// |---|---|---|---|
/// | 0 | new_air_mode | `0..=3` | [`Config::NewAirMode`] |
/// | 1-4 | radiant panels | `0..=1` | [`Config::Radiant`] |
/// | 5 | seat | `0..=2` | [`Config::Seat`] |
/// | 6 | smart_vent | `0..=1` | [`Config::SmartVent`] |
/// | 7 | window_heating | `0..=1` | [`Config::WindowHeating`] |
/// | 8 | fan_power | `[0, 400]` | |
/// | 9 | compressor_power | `[0, 3000]` | |
/// | 10 | blower_level | `[179, 400]` | |
/// | 11 | recirc | `[0, 1]` | |
/// | 12 | dist_defrost | `[0, 1]` | |
/// | 13 | hv_heater | `[0, 6000]` | |
#[derive(Clone, Debug)]
pub struct FullAct {
    assembler: ActionAssembler,
}

impl FullAct {
    /// The assembler.
    pub fn assembler(&self) -> &ActionAssembler {
        &self.assembler
    }
}

fn full_dims() -> Vec<ActionDim> {
    vec![
        ActionDim::discrete("new_air_mode", 4).gated(Config::NewAirMode),
        ActionDim::discrete("radiant_0", 2).gated(Config::Radiant),
        ActionDim::discrete("radiant_1", 2).gated(Config::Radiant),
        ActionDim::discrete("radiant_2", 2).gated(Config::Radiant),
        ActionDim::discrete("radiant_3", 2).gated(Config::Radiant),
        ActionDim::discrete("seat", 3).gated(Config::Seat),
        ActionDim::discrete("smart_vent", 2).gated(Config::SmartVent),
        ActionDim::discrete("window_heating", 2).gated(Config::WindowHeating),
        ActionDim::continuous("fan_power", 0.0, 400.0),
        ActionDim::continuous("compressor_power", 0.0, 3000.0),
        ActionDim::continuous("blower_level", BLOWER_MIN, BLOWER_MAX),
        ActionDim::continuous("recirc", 0.0, 1.0),
        ActionDim::continuous("dist_defrost", 0.0, 1.0),
        ActionDim::continuous("hv_heater", 0.0, 6000.0),
    ]
}

impl ActionStrategy for FullAct {
    fn build(configuration: &ConfigSet) -> Result<Self> {
        Ok(Self {
            assembler: ActionAssembler::new(full_dims(), configuration.clone())?,
        })
    }

    fn action_space(&self) -> BoxSpace {
        self.assembler.action_space()
    }

    fn physical_space(&self) -> BoxSpace {
        self.assembler.physical_space()
    }

    fn convert_action(&self, a: &[f32]) -> Result<Vec<f32>> {
        self.assembler.assemble(a)
    }

    fn control(&self, x: &[f32]) -> CabinControl {
        let level = |i: usize| x.get(i).copied().unwrap_or(0.0) as u8;
        let value = |i: usize| x.get(i).copied().unwrap_or(0.0);
        CabinControl {
            new_air_mode: level(0),
            radiant: [level(1), level(2), level(3), level(4)],
            seat: level(5),
            smart_vent: level(6),
            window_heating: value(7),
            fan_power: value(8),
            compressor_power: value(9),
            blower_level: value(10),
            recirc: value(11),
            dist_defrost: value(12),
            hv_heater: value(13),
        }
    }
}
