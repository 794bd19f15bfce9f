//! Measurement Uncertainty Models
//!
//! ## Overview
//!
//! A simulated measurement is the truth plus the errors a real sensor chain
//! would add. Each error source is an [`ErrCalculator`]: it takes the current
//! basis (the truth, or the truth with earlier errors applied) and returns an
//! error array of exactly the same (sensors, components, times) shape.
//!
//! ## Error Families
//!
//! ### Random
//! Redrawn independently for every sensor, component and time:
//! - [`RandErrUniform`], [`RandErrNormal`]: absolute noise
//! - [`RandErrUnifPercent`], [`RandErrNormPercent`]: noise scaled by the basis
//!
//! ### Systematic
//! Drawn once per sensor/component and held for the whole time axis:
//! - [`SysErrUniform`], [`SysErrNormal`]: absolute offsets
//! - [`SysErrUnifPercent`], [`SysErrNormPercent`]: offsets scaled by the basis
//!
//! ### Post-processing
//! Deterministic functions of the basis:
//! - [`SysErrDigitisation`]: quantisation to the logger resolution
//! - [`SysErrSaturation`]: clipping to the measurement range
//!
//! ### Field based
//! Re-sample the field itself:
//! - [`SysErrPosition`]: sensor placement uncertainty
//! - [`SysErrSpatialAverage`]: finite sensor footprint
//! - [`SysErrTemporalAverage`]: finite integration time
//!
//! ## Reproducibility
//!
//! Every randomised calculator owns its own generator seeded from an optional
//! `u64`. The same seed and the same call sequence give bit-identical errors.
//! Without a seed the generator is seeded from OS entropy.
//!
//! ## Composition
//!
//! Calculators belonging to one pipeline stage are combined by an
//! [`ErrorIntegrator`], statically (all see the same basis) or recursively
//! (each sees the basis plus every earlier error).

mod field_sys_errs;
mod integrator;
mod post_sys_errs;
mod rand_errs;
mod sys_errs;

use std::fmt;

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::{SimSenseError, SimSenseResult};

pub use field_sys_errs::{SysErrPosition, SysErrSpatialAverage, SysErrTemporalAverage};
pub use integrator::{ErrorIntegrator, IntegrationMode};
pub use post_sys_errs::{SysErrDigitisation, SysErrSaturation};
pub use rand_errs::{RandErrNormPercent, RandErrNormal, RandErrUnifPercent, RandErrUniform};
pub use sys_errs::{SysErrNormPercent, SysErrNormal, SysErrUnifPercent, SysErrUniform};

/// Measurement array shape: (num_sensors, num_components, num_sample_times)
pub type MeasShape = (usize, usize, usize);

/// One source of measurement error
pub trait ErrCalculator: Send + fmt::Debug {
    /// Error contribution for `err_basis`, same shape as the basis.
    ///
    /// The basis fixes the measurement shape; randomised calculators advance
    /// their generator on every call.
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Generator for a calculator, from a seed or from entropy
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Reject a uniform range that cannot be sampled
pub(crate) fn check_uniform_bounds(low: f64, high: f64) -> SimSenseResult<()> {
    if !(low.is_finite() && high.is_finite()) || low >= high {
        return Err(SimSenseError::InvalidParameter {
            name: "low/high",
            reason: format!("need finite low < high, got [{}, {}]", low, high),
        });
    }
    Ok(())
}

/// Reject a standard deviation that cannot be sampled
pub(crate) fn check_std(std: f64) -> SimSenseResult<()> {
    if !std.is_finite() || std < 0.0 {
        return Err(SimSenseError::InvalidParameter {
            name: "std",
            reason: format!("need finite std >= 0, got {}", std),
        });
    }
    Ok(())
}

/// Fail when a field-derived array does not match the basis shape
pub(crate) fn check_same_shape(basis: &Array3<f64>, errs: &Array3<f64>) -> SimSenseResult<()> {
    if basis.dim() != errs.dim() {
        return Err(SimSenseError::shape_mismatch(basis.shape(), errs.shape()));
    }
    Ok(())
}
