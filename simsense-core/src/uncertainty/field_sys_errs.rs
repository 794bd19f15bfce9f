//! Field-based systematic errors
//!
//! These calculators do not draw an error directly: they re-sample the field
//! the way an imperfect sensor would see it and report the difference from
//! the basis. The basis they receive must be the truth at the nominal
//! positions and sample times, so they belong in the pre-systematic stage.
//!
//! ```text
//! nominal positions ──► field ──► basis
//! perturbed / averaged ──► field ──► sensed
//!                                     error = sensed - basis
//! ```

use std::sync::Arc;

use ndarray::{Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::{
    errors::{SimSenseError, SimSenseResult},
    field::{check_times, SampleField},
};

use super::{check_same_shape, check_std, seeded_rng, ErrCalculator};

fn check_positions(sens_pos: &Array2<f64>) -> SimSenseResult<()> {
    if sens_pos.ncols() != 3 {
        return Err(SimSenseError::shape_mismatch(&[sens_pos.nrows(), 3], sens_pos.shape()));
    }
    Ok(())
}

fn check_sample_times(sample_times: Option<&Array1<f64>>) -> SimSenseResult<()> {
    match sample_times {
        Some(times) => check_times(times),
        None => Ok(()),
    }
}

/// Sensor placement uncertainty.
///
/// Every call draws a fresh normal offset per sensor on each enabled axis,
/// applies it to a private copy of the nominal positions and samples the
/// field there. An axis with `None` or zero standard deviation is left where
/// it is.
#[derive(Debug)]
pub struct SysErrPosition {
    field: Arc<dyn SampleField>,
    sens_pos_original: Array2<f64>,
    sens_pos_perturbed: Array2<f64>,
    std_by_ax: [Option<f64>; 3],
    dists: [Option<Normal<f64>>; 3],
    sample_times: Option<Array1<f64>>,
    rng: StdRng,
}

impl SysErrPosition {
    /// Position error with one standard deviation per axis (x, y, z)
    pub fn new(
        field: Arc<dyn SampleField>,
        sens_pos: Array2<f64>,
        std_by_ax: [Option<f64>; 3],
        sample_times: Option<Array1<f64>>,
        seed: Option<u64>,
    ) -> SimSenseResult<Self> {
        check_positions(&sens_pos)?;
        check_sample_times(sample_times.as_ref())?;

        let mut dists = [None, None, None];
        for (dist, std) in dists.iter_mut().zip(std_by_ax) {
            if let Some(std) = std {
                check_std(std)?;
                if std > 0.0 {
                    *dist = Some(Normal::new(0.0, std).map_err(|e| {
                        SimSenseError::InvalidParameter {
                            name: "std_by_ax",
                            reason: e.to_string(),
                        }
                    })?);
                }
            }
        }

        Ok(Self {
            field,
            sens_pos_perturbed: sens_pos.clone(),
            sens_pos_original: sens_pos,
            std_by_ax,
            dists,
            sample_times,
            rng: seeded_rng(seed),
        })
    }

    /// Positions used by the most recent call (nominal before the first)
    pub fn get_perturbed_pos(&self) -> &Array2<f64> {
        &self.sens_pos_perturbed
    }

    /// Nominal sensor positions
    pub fn nominal_pos(&self) -> &Array2<f64> {
        &self.sens_pos_original
    }

    /// Standard deviation per axis
    pub fn std_by_ax(&self) -> [Option<f64>; 3] {
        self.std_by_ax
    }
}

impl ErrCalculator for SysErrPosition {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let mut perturbed = self.sens_pos_original.clone();
        for (axis, dist) in self.dists.iter().enumerate() {
            if let Some(dist) = dist {
                for pos in perturbed.column_mut(axis) {
                    *pos += dist.sample(&mut self.rng);
                }
            }
        }

        let sensed = self.field.sample_field(&perturbed, self.sample_times.as_ref())?;
        self.sens_pos_perturbed = perturbed;

        check_same_shape(err_basis, &sensed)?;
        Ok(sensed - err_basis)
    }

    fn name(&self) -> &'static str {
        "SysErrPosition"
    }
}

/// Offsets of a regular grid spanning `±half_width` on each axis
fn box_offsets(half_widths: [f64; 3], points_per_axis: usize) -> Vec<[f64; 3]> {
    let axis_offsets: Vec<Array1<f64>> = half_widths
        .iter()
        .map(|&hw| {
            if hw > 0.0 && points_per_axis > 1 {
                Array1::linspace(-hw, hw, points_per_axis)
            } else {
                Array1::zeros(1)
            }
        })
        .collect();

    let mut offsets = Vec::new();
    for &dx in &axis_offsets[0] {
        for &dy in &axis_offsets[1] {
            for &dz in &axis_offsets[2] {
                offsets.push([dx, dy, dz]);
            }
        }
    }
    offsets
}

/// Finite sensor footprint.
///
/// The sensed value is the mean of the field over a regular grid of points
/// inside an axis-aligned box centred on each sensor. Axes with zero half
/// width are not sampled across. Every grid point must lie inside the mesh.
#[derive(Debug)]
pub struct SysErrSpatialAverage {
    field: Arc<dyn SampleField>,
    sens_pos: Array2<f64>,
    offsets: Vec<[f64; 3]>,
    sample_times: Option<Array1<f64>>,
}

impl SysErrSpatialAverage {
    /// Average over `points_per_axis` points along each axis of the box
    pub fn new(
        field: Arc<dyn SampleField>,
        sens_pos: Array2<f64>,
        half_widths: [f64; 3],
        points_per_axis: usize,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<Self> {
        check_positions(&sens_pos)?;
        check_sample_times(sample_times.as_ref())?;
        if half_widths.iter().any(|hw| !hw.is_finite() || *hw < 0.0) {
            return Err(SimSenseError::InvalidParameter {
                name: "half_widths",
                reason: format!("need finite half widths >= 0, got {:?}", half_widths),
            });
        }
        if points_per_axis == 0 {
            return Err(SimSenseError::InvalidParameter {
                name: "points_per_axis",
                reason: "need at least one point per axis".to_string(),
            });
        }

        Ok(Self {
            field,
            sens_pos,
            offsets: box_offsets(half_widths, points_per_axis),
            sample_times,
        })
    }

    /// Number of field samples averaged per sensor
    pub fn num_avg_points(&self) -> usize {
        self.offsets.len()
    }
}

impl ErrCalculator for SysErrSpatialAverage {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let mut sum: Option<Array3<f64>> = None;
        for offset in &self.offsets {
            let mut shifted = self.sens_pos.clone();
            for (axis, delta) in offset.iter().enumerate() {
                shifted.column_mut(axis).mapv_inplace(|p| p + delta);
            }
            let sampled = self.field.sample_field(&shifted, self.sample_times.as_ref())?;
            sum = Some(match sum {
                Some(acc) => acc + sampled,
                None => sampled,
            });
        }

        let avg = sum.unwrap_or_else(|| Array3::zeros(err_basis.dim())) / self.offsets.len() as f64;
        check_same_shape(err_basis, &avg)?;
        Ok(avg - err_basis)
    }

    fn name(&self) -> &'static str {
        "SysErrSpatialAverage"
    }
}

/// Finite integration time.
///
/// The sensed value at time `t` is the mean of the field at
/// `points_in_window` evenly spaced times over `[t - window, t]`. Times before
/// the first simulation step clamp to it.
#[derive(Debug)]
pub struct SysErrTemporalAverage {
    field: Arc<dyn SampleField>,
    sens_pos: Array2<f64>,
    window: f64,
    points_in_window: usize,
    sample_times: Option<Array1<f64>>,
}

impl SysErrTemporalAverage {
    /// Average over a window of length `window` ending at each sample time
    pub fn new(
        field: Arc<dyn SampleField>,
        sens_pos: Array2<f64>,
        window: f64,
        points_in_window: usize,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<Self> {
        check_positions(&sens_pos)?;
        check_sample_times(sample_times.as_ref())?;
        if !window.is_finite() || window < 0.0 {
            return Err(SimSenseError::InvalidParameter {
                name: "window",
                reason: format!("need finite window >= 0, got {}", window),
            });
        }
        if points_in_window == 0 {
            return Err(SimSenseError::InvalidParameter {
                name: "points_in_window",
                reason: "need at least one point in the window".to_string(),
            });
        }

        Ok(Self {
            field,
            sens_pos,
            window,
            points_in_window,
            sample_times,
        })
    }

    /// Integration window length
    pub fn window(&self) -> f64 {
        self.window
    }
}

impl ErrCalculator for SysErrTemporalAverage {
    fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
        let times = match &self.sample_times {
            Some(times) => times.clone(),
            None => self.field.get_time_steps().clone(),
        };

        let lags = if self.points_in_window > 1 {
            Array1::linspace(self.window, 0.0, self.points_in_window)
        } else {
            Array1::zeros(1)
        };

        let mut sum = Array3::zeros(err_basis.dim());
        for &lag in &lags {
            let shifted = times.mapv(|t| t - lag);
            let sampled = self.field.sample_field(&self.sens_pos, Some(&shifted))?;
            check_same_shape(err_basis, &sampled)?;
            sum += &sampled;
        }

        let avg = sum / lags.len() as f64;
        Ok(avg - err_basis)
    }

    fn name(&self) -> &'static str {
        "SysErrTemporalAverage"
    }
}
