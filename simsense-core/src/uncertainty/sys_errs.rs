//! Systematic offsets
//!
//! One value is drawn per (sensor, component) and held across every sample
//! time: a calibration offset that does not drift during an experiment.
//! Offsets are drawn row-major over (sensor, component) and then tiled along
//! the time axis.

use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::errors::{SimSenseError, SimSenseResult};

use super::{check_std, check_uniform_bounds, seeded_rng, ErrCalculator};

/// One draw per (sensor, component)
fn draw_offsets<D: Distribution<f64>>(
    rng: &mut StdRng,
    dist: &D,
    shape: (usize, usize, usize),
) -> Array2<f64> {
    Array2::from_shape_simple_fn((shape.0, shape.1), || dist.sample(&mut *rng))
}

/// Repeat per-(sensor, component) offsets over `num_times` samples
fn tile_over_time(offsets: &Array2<f64>, num_times: usize) -> Array3<f64> {
    let (num_sens, num_comps) = offsets.dim();
    Array3::from_shape_fn((num_sens, num_comps, num_times), |(s, c, _)| offsets[[s, c]])
}

fn zero_mean_normal(std: f64) -> SimSenseResult<Normal<f64>> {
    check_std(std)?;
    Normal::new(0.0, std).map_err(|e| SimSenseError::InvalidParameter {
        name: "std",
        reason: e.to_string(),
    })
}

/// Uniform offset on [low, high)
#[derive(Debug, Clone)]
pub struct SysErrUniform {
    low: f64,
    high: f64,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl SysErrUniform {
    /// Offset between `low` and `high`
    pub fn new(low: f64, high: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        check_uniform_bounds(low, high)?;
        Ok(Self {
            low,
            high,
            dist: Uniform::new(low, high),
            rng: seeded_rng(seed),
        })
    }

    /// Lower and upper bound
    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

impl ErrCalculator for SysErrUniform {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let shape = err_basis.dim();
        let offsets = draw_offsets(&mut self.rng, &self.dist, shape);
        Ok(tile_over_time(&offsets, shape.2))
    }

    fn name(&self) -> &'static str {
        "SysErrUniform"
    }
}

/// Zero-mean normal offset
#[derive(Debug, Clone)]
pub struct SysErrNormal {
    std: f64,
    dist: Normal<f64>,
    rng: StdRng,
}

impl SysErrNormal {
    /// Offset with standard deviation `std`
    pub fn new(std: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        Ok(Self {
            std,
            dist: zero_mean_normal(std)?,
            rng: seeded_rng(seed),
        })
    }

    /// Standard deviation
    pub fn std(&self) -> f64 {
        self.std
    }
}

impl ErrCalculator for SysErrNormal {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let shape = err_basis.dim();
        let offsets = draw_offsets(&mut self.rng, &self.dist, shape);
        Ok(tile_over_time(&offsets, shape.2))
    }

    fn name(&self) -> &'static str {
        "SysErrNormal"
    }
}

/// Uniform offset as a percentage of the basis value.
///
/// The percentage is fixed per sensor/component; the error still follows the
/// basis in time, like a gain error.
#[derive(Debug, Clone)]
pub struct SysErrUnifPercent {
    low_percent: f64,
    high_percent: f64,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl SysErrUnifPercent {
    /// Offset between `low_percent` and `high_percent` of each value
    pub fn new(low_percent: f64, high_percent: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        check_uniform_bounds(low_percent, high_percent)?;
        Ok(Self {
            low_percent,
            high_percent,
            dist: Uniform::new(low_percent / 100.0, high_percent / 100.0),
            rng: seeded_rng(seed),
        })
    }

    /// Lower and upper bound in percent
    pub fn bounds_percent(&self) -> (f64, f64) {
        (self.low_percent, self.high_percent)
    }
}

impl ErrCalculator for SysErrUnifPercent {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let shape = err_basis.dim();
        let norm = draw_offsets(&mut self.rng, &self.dist, shape);
        Ok(err_basis * &tile_over_time(&norm, shape.2))
    }

    fn name(&self) -> &'static str {
        "SysErrUnifPercent"
    }
}

/// Normal offset with a standard deviation in percent of the basis value
#[derive(Debug, Clone)]
pub struct SysErrNormPercent {
    std_percent: f64,
    dist: Normal<f64>,
    rng: StdRng,
}

impl SysErrNormPercent {
    /// Offset of `std_percent` % standard deviation
    pub fn new(std_percent: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        check_std(std_percent)?;
        Ok(Self {
            std_percent,
            dist: zero_mean_normal(std_percent / 100.0)?,
            rng: seeded_rng(seed),
        })
    }

    /// Standard deviation in percent
    pub fn std_percent(&self) -> f64 {
        self.std_percent
    }
}

impl ErrCalculator for SysErrNormPercent {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let shape = err_basis.dim();
        let norm = draw_offsets(&mut self.rng, &self.dist, shape);
        Ok(err_basis * &tile_over_time(&norm, shape.2))
    }

    fn name(&self) -> &'static str {
        "SysErrNormPercent"
    }
}
