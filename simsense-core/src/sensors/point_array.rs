//! Point sensor arrays: the measurement pipeline for a fixed set of sensors.

use std::sync::Arc;

use ndarray::{Array1, Array2, Array3};

use crate::{
    errors::{SimSenseError, SimSenseResult},
    field::{check_times, SampleField},
    uncertainty::{ErrorIntegrator, MeasShape},
};

use super::SensorDescriptor;

/// Stage contributions of the most recent measurement
#[derive(Debug, Clone, Default)]
struct StageErrors {
    pre_sys: Option<Array3<f64>>,
    rand: Option<Array3<f64>>,
    post_sys: Option<Array3<f64>>,
}

/// Sensors at fixed points in a field.
///
/// Row `i` of the positions is sensor `i` in every array this type returns.
/// A measurement request runs
///
/// ```text
/// truth ─► pre-sys ─► random ─► post-sys ─► measurement
/// ```
///
/// where each stage sees the running total of truth and every earlier stage
/// as its basis. Missing stages contribute nothing, so an array without
/// integrators measures the truth exactly.
///
/// Random calculators advance their generators on every request, so two
/// calls to [`get_measurements`](Self::get_measurements) generally differ.
#[derive(Debug)]
pub struct PointSensorArray {
    positions: Array2<f64>,
    field: Option<Arc<dyn SampleField>>,
    sample_times: Option<Array1<f64>>,
    descriptor: SensorDescriptor,

    pre_sys_err_int: Option<ErrorIntegrator>,
    rand_err_int: Option<ErrorIntegrator>,
    post_sys_err_int: Option<ErrorIntegrator>,

    truth: Option<Array3<f64>>,
    stage_errs: StageErrors,
    measurements: Option<Array3<f64>>,
}

impl PointSensorArray {
    /// Sensors at `positions` (n, 3) sampling `field`.
    ///
    /// Without `sample_times` the field's own time steps are used.
    pub fn new(
        positions: Array2<f64>,
        field: Arc<dyn SampleField>,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<Self> {
        let mut array = Self::unattached(positions, sample_times)?;
        array.field = Some(field);
        Ok(array)
    }

    /// Sensors with no field yet; attach one with [`set_field`](Self::set_field)
    pub fn unattached(
        positions: Array2<f64>,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<Self> {
        if positions.ncols() != 3 {
            return Err(SimSenseError::shape_mismatch(
                &[positions.nrows(), 3],
                positions.shape(),
            ));
        }
        if let Some(times) = &sample_times {
            check_times(times)?;
        }

        Ok(Self {
            positions,
            field: None,
            sample_times,
            descriptor: SensorDescriptor::default(),
            pre_sys_err_int: None,
            rand_err_int: None,
            post_sys_err_int: None,
            truth: None,
            stage_errs: StageErrors::default(),
            measurements: None,
        })
    }

    /// Attach labelling metadata
    pub fn with_descriptor(mut self, descriptor: SensorDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Labelling metadata
    pub fn get_descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    /// Sensor positions (num_sensors, 3)
    pub fn get_positions(&self) -> &Array2<f64> {
        &self.positions
    }

    /// Attached field, if any
    pub fn get_field(&self) -> Option<&Arc<dyn SampleField>> {
        self.field.as_ref()
    }

    /// Replace the field. Cached truth and errors are discarded.
    pub fn set_field(&mut self, field: Arc<dyn SampleField>) {
        self.field = Some(field);
        self.invalidate();
    }

    /// Sample times: the explicit ones, else the field's time steps
    pub fn get_sample_times(&self) -> SimSenseResult<&Array1<f64>> {
        match (&self.sample_times, &self.field) {
            (Some(times), _) => Ok(times),
            (None, Some(field)) => Ok(field.get_time_steps()),
            (None, None) => Err(SimSenseError::FieldNotAttached),
        }
    }

    /// Replace the sample times. Cached truth and errors are discarded;
    /// integrators built for the old shape will fail the next request.
    pub fn set_sample_times(&mut self, sample_times: Option<Array1<f64>>) -> SimSenseResult<()> {
        if let Some(times) = &sample_times {
            check_times(times)?;
        }
        self.sample_times = sample_times;
        self.invalidate();
        Ok(())
    }

    /// (num_sensors, num_components, num_sample_times)
    pub fn get_measurement_shape(&self) -> SimSenseResult<MeasShape> {
        let field = self.field.as_ref().ok_or(SimSenseError::FieldNotAttached)?;
        Ok((
            self.positions.nrows(),
            field.num_components(),
            self.get_sample_times()?.len(),
        ))
    }

    /// Replace the pre-processing systematic stage
    pub fn set_pre_sys_err_integrator(&mut self, integrator: ErrorIntegrator) {
        self.pre_sys_err_int = Some(integrator);
    }

    /// Replace the random stage
    pub fn set_rand_err_integrator(&mut self, integrator: ErrorIntegrator) {
        self.rand_err_int = Some(integrator);
    }

    /// Replace the post-processing systematic stage
    pub fn set_post_sys_err_integrator(&mut self, integrator: ErrorIntegrator) {
        self.post_sys_err_int = Some(integrator);
    }

    /// Pre-processing systematic stage, if configured
    pub fn pre_sys_err_integrator(&self) -> Option<&ErrorIntegrator> {
        self.pre_sys_err_int.as_ref()
    }

    /// Random stage, if configured
    pub fn rand_err_integrator(&self) -> Option<&ErrorIntegrator> {
        self.rand_err_int.as_ref()
    }

    /// Post-processing systematic stage, if configured
    pub fn post_sys_err_integrator(&self) -> Option<&ErrorIntegrator> {
        self.post_sys_err_int.as_ref()
    }

    /// Field sampled at the sensors, computed once and cached
    pub fn get_truth_values(&mut self) -> SimSenseResult<&Array3<f64>> {
        let truth = match self.truth.take() {
            Some(truth) => truth,
            None => {
                let field = self.field.as_ref().ok_or(SimSenseError::FieldNotAttached)?;
                field.sample_field(&self.positions, self.sample_times.as_ref())?
            }
        };
        Ok(self.truth.insert(truth))
    }

    /// Run the pipeline and return truth plus every stage's errors
    pub fn get_measurements(&mut self) -> SimSenseResult<Array3<f64>> {
        let shape = self.get_measurement_shape()?;
        for integrator in [&self.pre_sys_err_int, &self.rand_err_int, &self.post_sys_err_int]
            .into_iter()
            .flatten()
        {
            if integrator.meas_shape() != shape {
                let (s, c, t) = integrator.meas_shape();
                return Err(SimSenseError::ShapeMismatch {
                    expected: vec![shape.0, shape.1, shape.2],
                    found: vec![s, c, t],
                });
            }
        }

        let mut measured = self.get_truth_values()?.clone();
        let stage_errs = StageErrors {
            pre_sys: apply_stage(self.pre_sys_err_int.as_mut(), &mut measured)?,
            rand: apply_stage(self.rand_err_int.as_mut(), &mut measured)?,
            post_sys: apply_stage(self.post_sys_err_int.as_mut(), &mut measured)?,
        };

        log::debug!(
            "Measured {:?}: pre-sys {}, rand {}, post-sys {}",
            shape,
            stage_errs.pre_sys.is_some(),
            stage_errs.rand.is_some(),
            stage_errs.post_sys.is_some()
        );

        self.stage_errs = stage_errs;
        self.measurements = Some(measured.clone());
        Ok(measured)
    }

    /// Measurements from the most recent request
    pub fn last_measurements(&self) -> Option<&Array3<f64>> {
        self.measurements.as_ref()
    }

    /// Pre-processing systematic errors from the most recent request
    pub fn get_pre_sys_errs(&self) -> Option<&Array3<f64>> {
        self.stage_errs.pre_sys.as_ref()
    }

    /// Random errors from the most recent request
    pub fn get_rand_errs(&self) -> Option<&Array3<f64>> {
        self.stage_errs.rand.as_ref()
    }

    /// Post-processing systematic errors from the most recent request
    pub fn get_post_sys_errs(&self) -> Option<&Array3<f64>> {
        self.stage_errs.post_sys.as_ref()
    }

    /// Pre plus post systematic errors; `None` before the first request
    pub fn get_sys_errs(&self) -> Option<Array3<f64>> {
        let measured = self.measurements.as_ref()?;
        let mut sys = Array3::zeros(measured.dim());
        for errs in [&self.stage_errs.pre_sys, &self.stage_errs.post_sys]
            .into_iter()
            .flatten()
        {
            sys += errs;
        }
        Some(sys)
    }

    fn invalidate(&mut self) {
        self.truth = None;
        self.stage_errs = StageErrors::default();
        self.measurements = None;
    }
}

/// Run one stage against the running total and add its contribution
fn apply_stage(
    integrator: Option<&mut ErrorIntegrator>,
    running: &mut Array3<f64>,
) -> SimSenseResult<Option<Array3<f64>>> {
    let Some(integrator) = integrator else {
        return Ok(None);
    };
    integrator.calc_errs(running)?;
    let errs = integrator.get_errs_tot();
    *running += &errs;
    Ok(Some(errs))
}
