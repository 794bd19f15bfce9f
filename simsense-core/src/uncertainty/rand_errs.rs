//! Random errors
//!
//! Noise redrawn independently at every (sensor, component, time) entry,
//! drawn in row-major order so a seed fixes the whole array.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::errors::{SimSenseError, SimSenseResult};

use super::{check_std, check_uniform_bounds, seeded_rng, ErrCalculator};

fn draw<D: Distribution<f64>>(rng: &mut StdRng, dist: &D, shape: (usize, usize, usize)) -> Array3<f64> {
    Array3::from_shape_simple_fn(shape, || dist.sample(&mut *rng))
}

fn normal(std: f64) -> SimSenseResult<Normal<f64>> {
    check_std(std)?;
    Normal::new(0.0, std).map_err(|e| SimSenseError::InvalidParameter {
        name: "std",
        reason: e.to_string(),
    })
}

/// Uniform noise on [low, high)
#[derive(Debug, Clone)]
pub struct RandErrUniform {
    low: f64,
    high: f64,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl RandErrUniform {
    /// Uniform noise between `low` and `high`
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

impl ErrCalculator for RandErrUniform {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        Ok(draw(&mut self.rng, &self.dist, err_basis.dim()))
    }

    fn name(&self) -> &'static str {
        "RandErrUniform"
    }
}

/// Uniform noise as a percentage of the basis value
#[derive(Debug, Clone)]
pub struct RandErrUnifPercent {
    low_percent: f64,
    high_percent: f64,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl RandErrUnifPercent {
    /// Noise between `low_percent` and `high_percent` of each value
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

impl ErrCalculator for RandErrUnifPercent {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let norm_rand = draw(&mut self.rng, &self.dist, err_basis.dim());
        Ok(err_basis * &norm_rand)
    }

    fn name(&self) -> &'static str {
        "RandErrUnifPercent"
    }
}

/// Zero-mean normal noise
#[derive(Debug, Clone)]
pub struct RandErrNormal {
    std: f64,
    dist: Normal<f64>,
    rng: StdRng,
}

impl RandErrNormal {
    /// Normal noise with standard deviation `std`
    pub fn new(std: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        Ok(Self {
            std,
            dist: normal(std)?,
            rng: seeded_rng(seed),
        })
    }

    /// Standard deviation
    pub fn std(&self) -> f64 {
        self.std
    }
}

impl ErrCalculator for RandErrNormal {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        Ok(draw(&mut self.rng, &self.dist, err_basis.dim()))
    }

    fn name(&self) -> &'static str {
        "RandErrNormal"
    }
}

/// Zero-mean normal noise with a standard deviation in percent of the basis
#[derive(Debug, Clone)]
pub struct RandErrNormPercent {
    std_percent: f64,
    dist: Normal<f64>,
    rng: StdRng,
}

impl RandErrNormPercent {
    /// Normal noise of `std_percent` % of each value
    pub fn new(std_percent: f64, seed: Option<u64>) -> SimSenseResult<Self> {
        check_std(std_percent)?;
        Ok(Self {
            std_percent,
            dist: normal(1.0)?,
            rng: seeded_rng(seed),
        })
    }

    /// Standard deviation in percent
    pub fn std_percent(&self) -> f64 {
        self.std_percent
    }
}

impl ErrCalculator for RandErrNormPercent {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let scale = self.std_percent / 100.0;
        let norm_rand = draw(&mut self.rng, &self.dist, err_basis.dim());
        Ok(err_basis * &norm_rand.mapv(|z| z * scale))
    }

    fn name(&self) -> &'static str {
        "RandErrNormPercent"
    }
}
