//! Sensor array configuration

use std::sync::Arc;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use simsense_core::{
    sensors::create_sensor_pos_array, PointSensorArray, SampleField, SensorDescriptor,
};

use crate::{
    calculator::{FieldContext, IntegratorConfig},
    ConfigError, ConfigResult,
};

/// Regular sensor grid, boundaries excluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Sensors along x, y and z
    pub n_sens: [usize; 3],
    /// Domain limits along x
    pub x_lims: (f64, f64),
    /// Domain limits along y
    pub y_lims: (f64, f64),
    /// Domain limits along z
    pub z_lims: (f64, f64),
}

/// A sensor array and its three error stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorArrayConfig {
    /// Explicit positions, one `[x, y, z]` per sensor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<[f64; 3]>>,
    /// Generated grid of positions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
    /// Sample times, the field's own steps when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_times: Option<Vec<f64>>,
    /// Labelling metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<SensorDescriptor>,
    /// Pre-processing systematic stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_sys: Option<IntegratorConfig>,
    /// Random stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rand: Option<IntegratorConfig>,
    /// Post-processing systematic stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_sys: Option<IntegratorConfig>,
}

impl SensorArrayConfig {
    /// Sensor positions (n, 3) from whichever placement is configured
    pub fn sensor_positions(&self) -> ConfigResult<Array2<f64>> {
        match (&self.positions, &self.grid) {
            (Some(rows), None) => Ok(Array2::from_shape_fn((rows.len(), 3), |(s, d)| rows[s][d])),
            (None, Some(grid)) => Ok(create_sensor_pos_array(
                grid.n_sens,
                grid.x_lims,
                grid.y_lims,
                grid.z_lims,
            )),
            (Some(_), Some(_)) => Err(ConfigError::Invalid(
                "give either 'positions' or 'grid', not both".to_string(),
            )),
            (None, None) => Err(ConfigError::Invalid(
                "sensor array needs 'positions' or 'grid'".to_string(),
            )),
        }
    }

    /// Build the sensor array against `field`
    pub fn build(&self, field: Arc<dyn SampleField>) -> ConfigResult<PointSensorArray> {
        let positions = self.sensor_positions()?;
        let sample_times = self.sample_times.clone().map(Array1::from_vec);

        let ctx = FieldContext {
            field: Arc::clone(&field),
            positions: positions.clone(),
            sample_times: sample_times.clone(),
        };

        let mut sens_array = PointSensorArray::new(positions, field, sample_times)?;
        if let Some(descriptor) = &self.descriptor {
            sens_array = sens_array.with_descriptor(descriptor.clone());
        }

        let shape = sens_array.get_measurement_shape()?;
        if let Some(stage) = &self.pre_sys {
            sens_array.set_pre_sys_err_integrator(stage.build(shape, Some(&ctx))?);
        }
        if let Some(stage) = &self.rand {
            sens_array.set_rand_err_integrator(stage.build(shape, Some(&ctx))?);
        }
        if let Some(stage) = &self.post_sys {
            sens_array.set_post_sys_err_integrator(stage.build(shape, Some(&ctx))?);
        }

        log::info!("Configured sensor array with measurement shape {:?}", shape);
        Ok(sens_array)
    }
}
