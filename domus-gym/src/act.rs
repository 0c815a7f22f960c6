//! Actions of the cabin environments.
//!
//! A policy emits a normalized vector in `[-1, 1]^N`. The [`ActionAssembler`]
//! turns it into physical actuator values in three steps: denormalization,
//! rounding of discrete dimensions and masking of the dimensions of features
//! that are not fitted. An [`ActionStrategy`] owns an assembler and maps the
//! physical vector onto a [`CabinControl`].
mod continuous;
mod discrete;
mod full;
use crate::{
    config::{Config, ConfigSet},
    sim::CabinControl,
    space::BoxSpace,
    transform::MinMaxTransform,
};
use anyhow::Result;
pub use continuous::ContinuousAct;
pub use discrete::DiscreteAct;
use domus_core::{error::DomusError, Act};
pub use full::FullAct;

/// Blower level multiplier.
pub const BLOWER_MULT: f32 = 17.0;

/// Blower level offset.
pub const BLOWER_ADD: f32 = 94.0;

/// Lowest blower level.
pub const BLOWER_MIN: f32 = 5.0 * BLOWER_MULT + BLOWER_ADD;

/// Highest blower level.
pub const BLOWER_MAX: f32 = 18.0 * BLOWER_MULT + BLOWER_ADD;

/// Action of the cabin environments.
///
/// Whether it holds normalized values or level indices depends on the
/// [`ActionStrategy`] of the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct CabinAct(pub Vec<f32>);

impl Act for CabinAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for CabinAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl AsRef<[f32]> for CabinAct {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Declaration of one action dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionDim {
    /// Name used in logs.
    pub name: &'static str,
    /// Lower physical bound.
    pub min: f32,
    /// Upper physical bound.
    pub max: f32,
    /// Number of levels of a discrete dimension, `None` if continuous.
    pub levels: Option<usize>,
    /// Feature the dimension belongs to, `None` if always active.
    pub gate: Option<Config>,
}

impl ActionDim {
    /// A continuous dimension.
    pub fn continuous(name: &'static str, min: f32, max: f32) -> Self {
        Self {
            name,
            min,
            max,
            levels: None,
            gate: None,
        }
    }

    /// A discrete dimension with levels `0..levels`.
    pub fn discrete(name: &'static str, levels: usize) -> Self {
        Self {
            name,
            min: 0.0,
            max: levels.saturating_sub(1) as f32,
            levels: Some(levels),
            gate: None,
        }
    }

    /// Attaches the dimension to a feature.
    pub fn gated(mut self, c: Config) -> Self {
        self.gate = Some(c);
        self
    }
}

/// Rounds a denormalized value to the nearest level index in `0..levels`.
///
/// Ties round away from zero.
pub fn round_level(x: f32, levels: usize) -> f32 {
    x.round().clamp(0.0, levels.saturating_sub(1) as f32)
}

/// Converts normalized actions into physical actuator values.
#[derive(Clone, Debug)]
pub struct ActionAssembler {
    dims: Vec<ActionDim>,
    transform: MinMaxTransform,
    configuration: ConfigSet,
}

impl ActionAssembler {
    /// Builds an assembler for the given dimensions and fitted features.
    pub fn new(dims: Vec<ActionDim>, configuration: ConfigSet) -> Result<Self> {
        let min = dims.iter().map(|d| d.min).collect();
        let max = dims.iter().map(|d| d.max).collect();
        let transform = MinMaxTransform::new(min, max)?;
        Ok(Self {
            dims,
            transform,
            configuration,
        })
    }

    /// Number of action dimensions.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Dimension declarations.
    pub fn dims(&self) -> &[ActionDim] {
        &self.dims
    }

    /// The range transform.
    pub fn transform(&self) -> &MinMaxTransform {
        &self.transform
    }

    /// The fitted features.
    pub fn configuration(&self) -> &ConfigSet {
        &self.configuration
    }

    /// The normalized action space `[-1, 1]^N`.
    pub fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(-1.0, 1.0, self.len())
    }

    /// The physical action space.
    pub fn physical_space(&self) -> BoxSpace {
        BoxSpace::new(
            self.transform.min().to_vec(),
            self.transform.max().to_vec(),
        )
    }

    /// Fails with [`DomusError::InvalidAction`] unless `a` lies in `[-1, 1]^N`.
    pub fn validate(&self, a: &[f32]) -> Result<()> {
        if !self.action_space().contains(a) {
            return Err(DomusError::InvalidAction(a.to_vec()).into());
        }
        Ok(())
    }

    /// Rounds every discrete dimension of a physical vector in place.
    pub fn round(&self, x: &mut [f32]) {
        for (v, d) in x.iter_mut().zip(self.dims.iter()) {
            if let Some(levels) = d.levels {
                *v = round_level(*v, levels);
            }
        }
    }

    /// Forces every dimension of a feature that is not fitted to zero.
    pub fn mask(&self, x: &mut [f32]) {
        for (v, d) in x.iter_mut().zip(self.dims.iter()) {
            if let Some(c) = d.gate {
                if !self.configuration.contains(c) {
                    *v = 0.0;
                }
            }
        }
    }

    /// Maps a normalized action to a physical one.
    pub fn assemble(&self, a: &[f32]) -> Result<Vec<f32>> {
        self.validate(a)?;
        let mut x = self.transform.denormalize(a)?;
        self.round(&mut x);
        self.mask(&mut x);
        Ok(x)
    }

    /// Maps a physical action to a normalized one.
    pub fn normalize(&self, x: &[f32]) -> Result<Vec<f32>> {
        self.transform.normalize(x)
    }
}

/// Interprets the actions of an environment.
pub trait ActionStrategy {
    /// Builds the strategy for a cabin with the given features.
    fn build(configuration: &ConfigSet) -> Result<Self>
    where
        Self: Sized;

    /// The space of actions accepted by [`ActionStrategy::convert_action`].
    fn action_space(&self) -> BoxSpace;

    /// The space of physical actions.
    fn physical_space(&self) -> BoxSpace;

    /// Maps an action emitted by a policy to physical actuator values.
    fn convert_action(&self, a: &[f32]) -> Result<Vec<f32>>;

    /// Maps physical actuator values to simulator commands.
    fn control(&self, phys: &[f32]) -> CabinControl;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler(configuration: ConfigSet) -> ActionAssembler {
        let dims = vec![
            ActionDim::discrete("mode", 4).gated(Config::NewAirMode),
            ActionDim::discrete("seat", 3).gated(Config::Seat),
            ActionDim::continuous("heater", 0.0, 6000.0),
            ActionDim::continuous("window", 0.0, 1.0).gated(Config::WindowHeating),
        ];
        ActionAssembler::new(dims, configuration).unwrap()
    }

    #[test]
    fn test_round_level() {
        assert_eq!(round_level(1.5, 4), 2.0);
        assert_eq!(round_level(1.49, 4), 1.0);
        assert_eq!(round_level(-0.2, 4), 0.0);
        assert_eq!(round_level(3.6, 4), 3.0);
    }

    #[test]
    fn test_assemble_bounds() {
        let asm = assembler(ConfigSet::all());
        assert_eq!(
            asm.assemble(&[-1.0; 4]).unwrap(),
            vec![0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            asm.assemble(&[1.0; 4]).unwrap(),
            vec![3.0, 2.0, 6000.0, 1.0]
        );
        // 0 maps to 1.5 and 1.0 before rounding
        assert_eq!(asm.assemble(&[0.0; 4]).unwrap()[..2], [2.0, 1.0]);
    }

    #[test]
    fn test_mask() {
        let asm = assembler(ConfigSet::empty());
        assert_eq!(
            asm.assemble(&[1.0; 4]).unwrap(),
            vec![0.0, 0.0, 6000.0, 0.0]
        );
    }

    #[test]
    fn test_invalid_action() {
        let asm = assembler(ConfigSet::all());
        for a in [vec![1.01, 0.0, 0.0, 0.0], vec![0.0; 3]] {
            let err = asm.assemble(&a).unwrap_err();
            assert_eq!(
                err.downcast_ref::<DomusError>(),
                Some(&DomusError::InvalidAction(a.clone()))
            );
        }
        let err = asm.assemble(&[f32::NAN, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomusError>(),
            Some(DomusError::InvalidAction(_))
        ));
    }
}
