//! Discrete HVAC action.
use super::{continuous::hvac_dims, ActionAssembler, ActionStrategy};
use crate::{config::ConfigSet, sim::CabinControl, space::BoxSpace};
use anyhow::Result;
use domus_core::error::DomusError;

/// Number of levels of each HVAC dimension.
pub const HVAC_LEVELS: [usize; 7] = [14, 7, 7, 5, 2, 2, 2];

/// HVAC action given as one level index per dimension.
///
/// Level `k` of a dimension with `n` levels maps to
/// `min + k (max - min) / (n - 1)`. The dimensions are those of
/// [`ContinuousAct`](super::ContinuousAct).
#[derive(Clone, Debug)]
pub struct DiscreteAct {
    assembler: ActionAssembler,
}

impl DiscreteAct {
    fn level_value(&self, i: usize, k: f32) -> f32 {
        let lo = self.assembler.transform().min()[i];
        let hi = self.assembler.transform().max()[i];
        let n = HVAC_LEVELS[i] as f32;
        lo + k * (hi - lo) / (n - 1.0)
    }
}

impl ActionStrategy for DiscreteAct {
    fn build(configuration: &ConfigSet) -> Result<Self> {
        Ok(Self {
            assembler: ActionAssembler::new(hvac_dims(), configuration.clone())?,
        })
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::new(
            vec![0.0; HVAC_LEVELS.len()],
            HVAC_LEVELS.iter().map(|&n| (n - 1) as f32).collect(),
        )
    }

    fn physical_space(&self) -> BoxSpace {
        self.assembler.physical_space()
    }

    fn convert_action(&self, a: &[f32]) -> Result<Vec<f32>> {
        let is_index = |k: &f32| k.fract() == 0.0;
        if !self.action_space().contains(a) || !a.iter().all(is_index) {
            return Err(DomusError::InvalidAction(a.to_vec()).into());
        }
        let mut x: Vec<f32> = a
            .iter()
            .enumerate()
            .map(|(i, &k)| self.level_value(i, k))
            .collect();
        self.assembler.mask(&mut x);
        Ok(x)
    }

    fn control(&self, phys: &[f32]) -> CabinControl {
        CabinControl::hvac(phys)
    }
}
