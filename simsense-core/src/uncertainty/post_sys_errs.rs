//! Post-processing systematic errors
//!
//! Applied after the noise: they act on the value the logger actually sees,
//! so their basis is the truth with every earlier error already added.
//! Both are deterministic.

use ndarray::Array3;

use crate::errors::{SimSenseError, SimSenseResult};

use super::ErrCalculator;

/// Quantisation to the logger resolution
#[derive(Debug, Clone, Copy)]
pub struct SysErrDigitisation {
    bits_per_unit: f64,
}

impl SysErrDigitisation {
    /// Quantise to steps of `1 / bits_per_unit`
    pub fn new(bits_per_unit: f64) -> SimSenseResult<Self> {
        if !bits_per_unit.is_finite() || bits_per_unit <= 0.0 {
            return Err(SimSenseError::InvalidParameter {
                name: "bits_per_unit",
                reason: format!("need finite value > 0, got {}", bits_per_unit),
            });
        }
        Ok(Self { bits_per_unit })
    }

    /// Resolution in bits per measurement unit
    pub fn bits_per_unit(&self) -> f64 {
        self.bits_per_unit
    }
}

impl ErrCalculator for SysErrDigitisation {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let bpu = self.bits_per_unit;
        Ok(err_basis.mapv(|v| (v * bpu).round() / bpu - v))
    }

    fn name(&self) -> &'static str {
        "SysErrDigitisation"
    }
}

/// Clipping to the measurable range
#[derive(Debug, Clone, Copy)]
pub struct SysErrSaturation {
    meas_min: f64,
    meas_max: f64,
}

impl SysErrSaturation {
    /// Clip readings to [meas_min, meas_max]
    pub fn new(meas_min: f64, meas_max: f64) -> SimSenseResult<Self> {
        if meas_min.is_nan() || meas_max.is_nan() || meas_min > meas_max {
            return Err(SimSenseError::InvalidParameter {
                name: "meas_min/meas_max",
                reason: format!("need meas_min <= meas_max, got [{}, {}]", meas_min, meas_max),
            });
        }
        Ok(Self { meas_min, meas_max })
    }

    /// Measurable range
    pub fn limits(&self) -> (f64, f64) {
        (self.meas_min, self.meas_max)
    }
}

impl ErrCalculator for SysErrSaturation {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let (lo, hi) = (self.meas_min, self.meas_max);
        Ok(err_basis.mapv(|v| v.clamp(lo, hi) - v))
    }

    fn name(&self) -> &'static str {
        "SysErrSaturation"
    }
}
