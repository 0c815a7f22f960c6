//! Min-max range transform between physical units and `[-1, 1]`.
use anyhow::Result;
use domus_core::error::DomusError;
use serde::{Deserialize, Serialize};

/// Relative tolerance, in units of the width of a dimension, within which
/// values slightly outside the bounds are clamped instead of rejected.
pub const RANGE_TOLERANCE: f64 = 1e-5;

/// Maps a bounded physical vector to `[-1, 1]^N` and back.
///
/// `normalize` is `2 (x - min) / (max - min) - 1` and `denormalize` is its
/// inverse. Arithmetic is done in `f64`; the bounds `±1` map exactly onto
/// `min` and `max`.
///
/// Inputs of [`MinMaxTransform::normalize`] outside the bounds by more than
/// [`RANGE_TOLERANCE`] of the width are rejected with
/// [`DomusError::OutOfRange`]; inputs within the tolerance are clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxTransform {
    min: Vec<f32>,
    max: Vec<f32>,
}

impl MinMaxTransform {
    /// Constructs the transform.
    ///
    /// Fails unless `min` and `max` have the same non-zero length and
    /// `min[i] < max[i]` for every dimension.
    pub fn new(min: Vec<f32>, max: Vec<f32>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(DomusError::InvalidTransform(format!(
                "min has {} dimensions, max has {}",
                min.len(),
                max.len()
            ))
            .into());
        }
        if min.is_empty() {
            return Err(DomusError::InvalidTransform("no dimension".to_string()).into());
        }
        for (i, (lo, hi)) in min.iter().zip(max.iter()).enumerate() {
            if !(lo < hi) || !lo.is_finite() || !hi.is_finite() {
                return Err(DomusError::InvalidTransform(format!(
                    "dimension {}: min {} is not below max {}",
                    i, lo, hi
                ))
                .into());
            }
        }
        Ok(Self { min, max })
    }

    /// The number of dimensions.
    pub fn len(&self) -> usize {
        self.min.len()
    }

    /// Lower physical bounds.
    pub fn min(&self) -> &[f32] {
        &self.min
    }

    /// Upper physical bounds.
    pub fn max(&self) -> &[f32] {
        &self.max
    }

    fn check_len(&self, x: &[f32]) -> Result<()> {
        if x.len() != self.len() {
            return Err(DomusError::InvalidAction(x.to_vec()).into());
        }
        Ok(())
    }

    /// Maps a physical vector into `[-1, 1]^N`.
    pub fn normalize(&self, x: &[f32]) -> Result<Vec<f32>> {
        self.check_len(x)?;
        x.iter()
            .enumerate()
            .map(|(i, &v)| {
                let (lo, hi) = (self.min[i] as f64, self.max[i] as f64);
                let width = hi - lo;
                let v64 = v as f64;
                let tol = RANGE_TOLERANCE * width;
                if !v64.is_finite() || v64 < lo - tol || v64 > hi + tol {
                    return Err(DomusError::OutOfRange {
                        dim: i,
                        value: v,
                        min: self.min[i],
                        max: self.max[i],
                    }
                    .into());
                }
                let y = 2.0 * (v64.clamp(lo, hi) - lo) / width - 1.0;
                Ok(y.clamp(-1.0, 1.0) as f32)
            })
            .collect()
    }

    /// Maps a vector in `[-1, 1]^N` back to physical units.
    ///
    /// Values outside `[-1, 1]` are extrapolated linearly; validating the
    /// input is the caller's job.
    pub fn denormalize(&self, y: &[f32]) -> Result<Vec<f32>> {
        self.check_len(y)?;
        Ok(y.iter()
            .enumerate()
            .map(|(i, &v)| {
                let (lo, hi) = (self.min[i] as f64, self.max[i] as f64);
                let v = v as f64;
                (0.5 * (1.0 - v) * lo + 0.5 * (1.0 + v) * hi) as f32
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> MinMaxTransform {
        MinMaxTransform::new(vec![179.0, 0.0, -3.5, 0.0], vec![400.0, 6000.0, 2.5, 1.0]).unwrap()
    }

    #[test]
    fn test_round_trip_physical() {
        let tr = transform();
        let xs = [
            vec![179.0, 0.0, -3.5, 0.0],
            vec![400.0, 6000.0, 2.5, 1.0],
            vec![250.3, 1234.5, 0.1, 0.75],
            vec![399.99, 0.001, -3.49, 0.5],
        ];
        for x in xs.iter() {
            let y = tr.normalize(x).unwrap();
            let x2 = tr.denormalize(&y).unwrap();
            for (i, (a, b)) in x.iter().zip(x2.iter()).enumerate() {
                let width = tr.max()[i] - tr.min()[i];
                assert!((a - b).abs() <= 1e-6 * width, "{:?} != {:?}", x, x2);
            }
        }
    }

    #[test]
    fn test_round_trip_normalized() {
        let tr = transform();
        for k in 0..=20 {
            let v = -1.0 + 0.1 * k as f32;
            let y = vec![v; 4];
            let y2 = tr.normalize(&tr.denormalize(&y).unwrap()).unwrap();
            for (a, b) in y.iter().zip(y2.iter()) {
                assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
            }
        }
    }

    #[test]
    fn test_bounds_are_exact() {
        let tr = transform();
        assert_eq!(tr.denormalize(&[-1.0; 4]).unwrap(), tr.min().to_vec());
        assert_eq!(tr.denormalize(&[1.0; 4]).unwrap(), tr.max().to_vec());
        assert_eq!(tr.normalize(tr.min()).unwrap(), vec![-1.0; 4]);
        assert_eq!(tr.normalize(tr.max()).unwrap(), vec![1.0; 4]);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let tr = transform();
        let err = tr.normalize(&[179.0, 6001.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DomusError>(),
            Some(&DomusError::OutOfRange {
                dim: 1,
                value: 6001.0,
                min: 0.0,
                max: 6000.0
            })
        );
        assert!(tr.normalize(&[f32::NAN, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_within_tolerance_is_clamped() {
        let tr = transform();
        let y = tr.normalize(&[400.0001, 0.0, 0.0, 1.000001]).unwrap();
        assert_eq!(y[0], 1.0);
        assert_eq!(y[3], 1.0);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(MinMaxTransform::new(vec![0.0], vec![0.0]).is_err());
        assert!(MinMaxTransform::new(vec![1.0], vec![0.0]).is_err());
        assert!(MinMaxTransform::new(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(MinMaxTransform::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_wrong_length() {
        let tr = transform();
        assert!(tr.normalize(&[0.0]).is_err());
        assert!(tr.denormalize(&[0.0; 5]).is_err());
    }
}
