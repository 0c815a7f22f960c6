//! Continuous HVAC action.
use super::{ActionAssembler, ActionDim, ActionStrategy, BLOWER_MAX, BLOWER_MIN};
use crate::{
    config::{Config, ConfigSet},
    sim::CabinControl,
    space::BoxSpace,
};
use anyhow::Result;

/// Dimensions of the 7-dimensional HVAC action.
pub(crate) fn hvac_dims() -> Vec<ActionDim> {
    vec![
        ActionDim::continuous("blower_level", BLOWER_MIN, BLOWER_MAX),
        ActionDim::continuous("compressor_power", 0.0, 3000.0),
        ActionDim::continuous("hv_heater", 0.0, 6000.0),
        ActionDim::continuous("fan_power", 0.0, 400.0),
        ActionDim::continuous("recirc", 0.0, 1.0),
        ActionDim::continuous("dist_defrost", 0.0, 1.0),
        ActionDim::continuous("window_heating", 0.0, 1.0).gated(Config::WindowHeating),
    ]
}

/// HVAC action
/// `[blower_level, compressor_power, hv_heater, fan_power, recirc, dist_defrost, window_heating]`.
///
/// Every dimension is continuous. The windshield heater is gated by
/// [`Config::WindowHeating`]; the other optional features are never used.
#[derive(Clone, Debug)]
pub struct ContinuousAct {
    assembler: ActionAssembler,
}

impl ContinuousAct {
    /// The assembler.
    pub fn assembler(&self) -> &ActionAssembler {
        &self.assembler
    }
}

impl ActionStrategy for ContinuousAct {
    fn build(configuration: &ConfigSet) -> Result<Self> {
        Ok(Self {
            assembler: ActionAssembler::new(hvac_dims(), configuration.clone())?,
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

    fn control(&self, phys: &[f32]) -> CabinControl {
        CabinControl::hvac(phys)
    }
}
