//! Preconfigured sensor arrays
//!
//! Each preset wraps the matching field kind, attaches a descriptor and the
//! basic error chain:
//!
//! | Stage    | Calculator                       |
//! |----------|----------------------------------|
//! | pre-sys  | `SysErrUnifPercent(-6 %, +6 %)`  |
//! | random   | `RandErrNormPercent(6 %)`        |
//! | post-sys | thermocouples only: digitisation then saturation |

use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::{
    constants::errors::{
        DEFAULT_ERR_PERCENT, THERMOCOUPLE_BITS_PER_UNIT, THERMOCOUPLE_MEAS_MAX,
        THERMOCOUPLE_MEAS_MIN,
    },
    errors::SimSenseResult,
    field::Field,
    simdata::SimData,
    uncertainty::{
        ErrCalculator, ErrorIntegrator, IntegrationMode, RandErrNormPercent, SysErrDigitisation,
        SysErrSaturation, SysErrUnifPercent,
    },
};

use super::{PointSensorArray, SensorDescriptor};

/// Builds sensor arrays with a standard error configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorArrayFactory {
    seed: Option<u64>,
}

impl SensorArrayFactory {
    /// Factory whose random errors are seeded from entropy
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Factory producing reproducible arrays
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Thermocouples on a scalar field
    pub fn basic_thermocouple_array(
        &self,
        sim_data: &SimData,
        positions: Array2<f64>,
        field_name: &str,
        spat_dims: usize,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<PointSensorArray> {
        let field = Field::scalar(sim_data, field_name, spat_dims)?;
        let mut sens_array = PointSensorArray::new(positions, Arc::new(field), sample_times)?
            .with_descriptor(SensorDescriptor::temperature());

        init_basic_errs(&mut sens_array, DEFAULT_ERR_PERCENT, self.seed)?;

        let post_sys: Vec<Box<dyn ErrCalculator>> = vec![
            Box::new(SysErrDigitisation::new(THERMOCOUPLE_BITS_PER_UNIT)?),
            Box::new(SysErrSaturation::new(THERMOCOUPLE_MEAS_MIN, THERMOCOUPLE_MEAS_MAX)?),
        ];
        let shape = sens_array.get_measurement_shape()?;
        // saturation must clamp the digitised value
        sens_array.set_post_sys_err_integrator(
            ErrorIntegrator::new(post_sys, shape).with_mode(IntegrationMode::Recursive),
        );

        Ok(sens_array)
    }

    /// In-plane displacement sensors on `disp_x`, `disp_y`
    pub fn basic_dispsens_array(
        &self,
        sim_data: &SimData,
        positions: Array2<f64>,
        field_name: &str,
        spat_dims: usize,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<PointSensorArray> {
        let field = Field::vector(sim_data, field_name, &["disp_x", "disp_y"], spat_dims)?;
        let mut sens_array = PointSensorArray::new(positions, Arc::new(field), sample_times)?
            .with_descriptor(SensorDescriptor::displacement());

        init_basic_errs(&mut sens_array, DEFAULT_ERR_PERCENT, self.seed)?;
        Ok(sens_array)
    }

    /// Strain gauges on a tensor field
    pub fn basic_straingauge_array(
        &self,
        sim_data: &SimData,
        positions: Array2<f64>,
        field_name: &str,
        spat_dims: usize,
        sample_times: Option<Array1<f64>>,
    ) -> SimSenseResult<PointSensorArray> {
        let (normal, dev): (&[&str], &[&str]) = if spat_dims == 2 {
            (&["strain_xx", "strain_yy"], &["strain_xy"])
        } else {
            (
                &["strain_xx", "strain_yy", "strain_zz"],
                &["strain_xy", "strain_yz", "strain_xz"],
            )
        };
        let field = Field::tensor(sim_data, field_name, normal, dev, spat_dims)?;
        let mut sens_array = PointSensorArray::new(positions, Arc::new(field), sample_times)?
            .with_descriptor(SensorDescriptor::strain(spat_dims));

        init_basic_errs(&mut sens_array, DEFAULT_ERR_PERCENT, self.seed)?;
        Ok(sens_array)
    }
}

/// Attach ±`err_pc` % systematic and `err_pc` % random errors.
///
/// With a seed the random stage uses `seed + 1` so the two stages draw
/// independent streams.
pub fn init_basic_errs(
    sens_array: &mut PointSensorArray,
    err_pc: f64,
    seed: Option<u64>,
) -> SimSenseResult<()> {
    let shape = sens_array.get_measurement_shape()?;

    let pre_sys: Vec<Box<dyn ErrCalculator>> =
        vec![Box::new(SysErrUnifPercent::new(-err_pc, err_pc, seed)?)];
    sens_array.set_pre_sys_err_integrator(ErrorIntegrator::new(pre_sys, shape));

    let rand: Vec<Box<dyn ErrCalculator>> = vec![Box::new(RandErrNormPercent::new(
        err_pc,
        seed.map(|s| s.wrapping_add(1)),
    )?)];
    sens_array.set_rand_err_integrator(ErrorIntegrator::new(rand, shape));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator};
    use crate::field::SampleField;
    use ndarray::array;

    fn sim_data() -> SimData {
        let case = AnalyticCaseData2D::default()
            .with_field("temperature", |x, y, t| 20.0 + 10.0 * x + 5.0 * y + t)
            .with_field("disp_x", |x, _y, t| 1e-3 * x * t)
            .with_field("disp_y", |_x, y, t| -1e-3 * y * t)
            .with_field("strain_xx", |_x, _y, t| 1e-3 * t)
            .with_field("strain_yy", |_x, _y, t| -1e-3 * t)
            .with_field("strain_xy", |_x, _y, _t| 0.0);
        AnalyticSimDataGenerator::new(case).generate_sim_data()
    }

    fn positions() -> Array2<f64> {
        array![[2.5, 2.5, 0.0], [7.5, 5.0, 0.0]]
    }

    #[test]
    fn thermocouples_are_digitised_and_reproducible() {
        let factory = SensorArrayFactory::seeded(17);
        let sim = sim_data();
        let mut a = factory
            .basic_thermocouple_array(&sim, positions(), "temperature", 2, None)
            .unwrap();
        let mut b = factory
            .basic_thermocouple_array(&sim, positions(), "temperature", 2, None)
            .unwrap();

        let meas = a.get_measurements().unwrap();
        assert_eq!(meas, b.get_measurements().unwrap());
        // steps of 5 units within [0, 1000]
        assert!(meas.iter().all(|m| (m / 5.0 - (m / 5.0).round()).abs() < 1e-9));
        assert!(meas.iter().all(|m| (0.0..=1000.0).contains(m)));
        assert_eq!(a.get_descriptor().tag, "TC");
    }

    fn constant_temperature(value: f64) -> SimData {
        let case = AnalyticCaseData2D::default().with_field("temperature", move |_x, _y, _t| value);
        AnalyticSimDataGenerator::new(case).generate_sim_data()
    }

    #[test]
    fn thermocouples_saturate_on_the_digitisation_grid() {
        for truth in [1100.0, -50.0] {
            let mut sensors = SensorArrayFactory::seeded(17)
                .basic_thermocouple_array(
                    &constant_temperature(truth),
                    positions(),
                    "temperature",
                    2,
                    None,
                )
                .unwrap();

            let meas = sensors.get_measurements().unwrap();
            for &m in meas.iter() {
                assert!(
                    (-1e-9..=1000.0 + 1e-9).contains(&m),
                    "{} out of range for truth {}",
                    m,
                    truth
                );
                assert!((m / 5.0 - (m / 5.0).round()).abs() < 1e-9, "{} off grid", m);
            }
        }

        // far below the range every reading sits on the lower limit
        let mut cold = SensorArrayFactory::seeded(3)
            .basic_thermocouple_array(&constant_temperature(-50.0), positions(), "temperature", 2, None)
            .unwrap();
        assert!(cold.get_measurements().unwrap().iter().all(|m| m.abs() < 1e-9));
    }

    #[test]
    fn dispsens_has_two_components() {
        let mut sensors = SensorArrayFactory::seeded(1)
            .basic_dispsens_array(&sim_data(), positions(), "displacement", 2, None)
            .unwrap();
        assert_eq!(sensors.get_measurement_shape().unwrap(), (2, 2, 11));
        assert!(sensors.get_post_sys_errs().is_none());
        sensors.get_measurements().unwrap();
        assert!(sensors.get_pre_sys_errs().is_some());
        assert!(sensors.get_post_sys_errs().is_none());
    }

    #[test]
    fn straingauge_2d_components() {
        let sensors = SensorArrayFactory::new()
            .basic_straingauge_array(&sim_data(), positions(), "strain", 2, Some(array![1.0, 2.0]))
            .unwrap();
        assert_eq!(sensors.get_measurement_shape().unwrap(), (2, 3, 2));
        let field = sensors.get_field().unwrap();
        assert_eq!(field.get_component_index("strain_xy"), Some(2));
    }

    #[test]
    fn missing_strain_component_in_3d() {
        let result = SensorArrayFactory::new().basic_straingauge_array(
            &sim_data(),
            positions(),
            "strain",
            3,
            None,
        );
        assert!(result.is_err());
    }
}
