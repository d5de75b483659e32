//! Fixed-shape sampled spectra.
//!
//! A [`Spectrum`] is a dense vector of radiometric samples over a regular
//! wavelength grid described by a [`SpectralShape`]. Every routine in the
//! solver pipeline works on the default (380, 780, 5) shape: 81 samples.
//!
//! Pointwise operators require both operands to share a shape; shapes are
//! validated once at ingest (see [`crate::SpectralData`]), so a mismatch
//! inside the pipeline is a programming error and panics.

use crate::{SpectralError, SpectralResult};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, MulAssign, Sub};

/// The wavelength grid of a sampled spectrum, in nanometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectralShape {
    /// First sampled wavelength.
    pub start: i32,
    /// Last sampled wavelength (inclusive).
    pub end: i32,
    /// Sampling step.
    pub step: i32,
}

impl SpectralShape {
    /// The working grid shared by all solver inputs: 380-780 nm at 5 nm.
    pub const DEFAULT: Self = Self {
        start: 380,
        end: 780,
        step: 5,
    };

    /// Number of samples on this grid.
    #[inline]
    pub fn sample_count(&self) -> usize {
        ((self.end - self.start) / self.step + 1) as usize
    }

    /// Iterates the sampled wavelengths.
    pub fn wavelengths(&self) -> impl Iterator<Item = i32> + '_ {
        (self.start..=self.end).step_by(self.step as usize)
    }
}

impl Default for SpectralShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A sampled spectrum over a fixed wavelength grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    shape: SpectralShape,
    values: Vec<f64>,
}

impl Spectrum {
    /// Creates a zero-filled spectrum over `shape`.
    pub fn zeros(shape: SpectralShape) -> Self {
        Self {
            shape,
            values: vec![0.0; shape.sample_count()],
        }
    }

    /// Creates a spectrum from samples, validating the count against `shape`.
    pub fn from_values(shape: SpectralShape, values: Vec<f64>) -> SpectralResult<Self> {
        if values.len() != shape.sample_count() {
            return Err(SpectralError::ShapeMismatch {
                channel: String::new(),
                expected: shape.sample_count(),
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// The wavelength grid.
    #[inline]
    pub fn shape(&self) -> SpectralShape {
        self.shape
    }

    /// The samples.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Maximum sample value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Rectangular integration: sum of samples times the step width.
    pub fn integrate(&self) -> f64 {
        self.values.iter().sum::<f64>() * f64::from(self.shape.step)
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(
            self.shape, rhs.shape,
            "pointwise spectral op on mismatched shapes"
        );
        Self {
            shape: self.shape,
            values: self
                .values
                .iter()
                .zip(&rhs.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl Add for &Spectrum {
    type Output = Spectrum;

    fn add(self, rhs: Self) -> Spectrum {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &Spectrum {
    type Output = Spectrum;

    fn sub(self, rhs: Self) -> Spectrum {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul for &Spectrum {
    type Output = Spectrum;

    fn mul(self, rhs: Self) -> Spectrum {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl Mul<f64> for &Spectrum {
    type Output = Spectrum;

    fn mul(self, rhs: f64) -> Spectrum {
        Spectrum {
            shape: self.shape,
            values: self.values.iter().map(|&v| v * rhs).collect(),
        }
    }
}

impl MulAssign<f64> for Spectrum {
    fn mul_assign(&mut self, rhs: f64) {
        for v in &mut self.values {
            *v *= rhs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Spectrum {
        let shape = SpectralShape::DEFAULT;
        let values = (0..shape.sample_count()).map(|i| i as f64).collect();
        Spectrum::from_values(shape, values).unwrap()
    }

    #[test]
    fn test_default_shape_has_81_samples() {
        assert_eq!(SpectralShape::DEFAULT.sample_count(), 81);
        let wls: Vec<i32> = SpectralShape::DEFAULT.wavelengths().collect();
        assert_eq!(wls.len(), 81);
        assert_eq!(wls[0], 380);
        assert_eq!(wls[80], 780);
    }

    #[test]
    fn test_from_values_checks_count() {
        let err = Spectrum::from_values(SpectralShape::DEFAULT, vec![1.0; 80]);
        assert!(matches!(
            err,
            Err(SpectralError::ShapeMismatch { expected: 81, actual: 80, .. })
        ));
    }

    #[test]
    fn test_integrate_is_sum_times_step() {
        let s = Spectrum::from_values(SpectralShape::DEFAULT, vec![2.0; 81]).unwrap();
        assert_eq!(s.integrate(), 2.0 * 81.0 * 5.0);
    }

    #[test]
    fn test_pointwise_mul() {
        let a = ramp();
        let b = Spectrum::from_values(SpectralShape::DEFAULT, vec![2.0; 81]).unwrap();
        let c = &a * &b;
        assert_eq!(c.values()[10], 20.0);
    }

    #[test]
    fn test_scalar_ops() {
        let mut s = ramp();
        let doubled = &s * 2.0;
        assert_eq!(doubled.values()[40], 80.0);
        s *= 0.5;
        assert_eq!(s.values()[40], 20.0);
    }

    #[test]
    fn test_max() {
        assert_eq!(ramp().max(), 80.0);
    }

    #[test]
    #[should_panic(expected = "mismatched shapes")]
    fn test_shape_mismatch_panics() {
        let a = ramp();
        let shape = SpectralShape { start: 400, end: 700, step: 10 };
        let b = Spectrum::zeros(shape);
        let _ = &a * &b;
    }
}
