//! Core measurement-synthesis engine for SimSense
//!
//! Turns a mesh-based simulation result into the readings a set of real
//! sensors would have produced: the field is sampled at the sensor
//! positions and times, then passed through configurable systematic and
//! random error stages.
//!
//! Key properties:
//! - Every array in the pipeline is (sensors, components, sample times)
//! - Seeded error models give bit-identical measurements across runs
//! - Failures are fatal for the request, never partially applied
//!
//! ```no_run
//! use simsense_core::SensorArrayFactory;
//! use simsense_core::analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator};
//! use simsense_core::sensors::create_sensor_pos_array;
//!
//! let case = AnalyticCaseData2D::default()
//!     .with_field("temperature", |x, y, t| 20.0 + (x + y) * t);
//! let sim_data = AnalyticSimDataGenerator::new(case).generate_sim_data();
//! let positions = create_sensor_pos_array([3, 2, 1], (0.0, 10.0), (0.0, 7.5), (0.0, 0.0));
//!
//! let mut thermocouples = SensorArrayFactory::seeded(42)
//!     .basic_thermocouple_array(&sim_data, positions, "temperature", 2, None)?;
//! let measurements = thermocouples.get_measurements()?;
//! assert_eq!(measurements.dim(), (6, 1, 11));
//! # Ok::<(), simsense_core::SimSenseError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod analytic;
pub mod constants;
pub mod errors;
pub mod field;
pub mod mesh;
pub mod sensors;
pub mod simdata;
pub mod uncertainty;

// Public API
pub use errors::{SimSenseError, SimSenseResult};
pub use field::{Field, FieldKind, SampleField};
pub use mesh::{CellType, UnstructuredMesh};
pub use sensors::{PointSensorArray, SensorArrayFactory, SensorDescriptor};
pub use simdata::SimData;
pub use uncertainty::{ErrCalculator, ErrorIntegrator, IntegrationMode, MeasShape};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
