//! Virtual Sensors
//!
//! ## Overview
//!
//! A [`PointSensorArray`] places sensors at fixed points in a field and turns
//! the sampled truth into simulated measurements through three error
//! stages. [`SensorArrayFactory`] builds the common presets, and the
//! remaining types are placement and labelling helpers.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use simsense_core::analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator};
//! use simsense_core::field::Field;
//! use simsense_core::sensors::{create_sensor_pos_array, PointSensorArray};
//!
//! let case = AnalyticCaseData2D::default()
//!     .with_field("temperature", |x, y, t| 20.0 + x * y * t);
//! let sim_data = AnalyticSimDataGenerator::new(case).generate_sim_data();
//! let field = Field::scalar(&sim_data, "temperature", 2)?;
//!
//! let positions = create_sensor_pos_array([4, 1, 1], (0.0, 10.0), (0.0, 7.5), (0.0, 0.0));
//! let mut sensors = PointSensorArray::new(positions, Arc::new(field), None)?;
//!
//! let measurements = sensors.get_measurements()?;
//! assert_eq!(measurements.dim(), sensors.get_measurement_shape()?);
//! # Ok::<(), simsense_core::SimSenseError>(())
//! ```

mod descriptor;
mod factory;
mod point_array;
mod positions;

pub use descriptor::SensorDescriptor;
pub use factory::{init_basic_errs, SensorArrayFactory};
pub use point_array::PointSensorArray;
pub use positions::create_sensor_pos_array;
