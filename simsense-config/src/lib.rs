//! Declarative Error Models and Sensor Arrays
//!
//! ## Overview
//!
//! Experiments are usually described once and re-run many times with
//! different seeds or sensor layouts. This crate lets that description live
//! in JSON instead of code: error calculators, the integrators that combine
//! them, and whole sensor arrays.
//!
//! ## Configuration Layout
//!
//! ```json
//! {
//!   "grid": { "n_sens": [3, 2, 1], "x_lims": [0.0, 10.0], "y_lims": [0.0, 7.5], "z_lims": [0.0, 0.0] },
//!   "sample_times": [1.0, 2.0, 3.0],
//!   "pre_sys": {
//!     "mode": "static",
//!     "calculators": [
//!       { "type": "sys_err_unif_percent", "low_percent": -6.0, "high_percent": 6.0, "seed": 1 },
//!       { "type": "sys_err_position", "std_by_ax": [0.1, 0.1, null], "seed": 2 }
//!     ]
//!   },
//!   "rand": { "calculators": [{ "type": "rand_err_norm_percent", "std_percent": 6.0, "seed": 3 }] },
//!   "post_sys": {
//!     "mode": "recursive",
//!     "calculators": [
//!       { "type": "sys_err_digitisation", "bits_per_unit": 0.2 },
//!       { "type": "sys_err_saturation", "meas_min": 0.0, "meas_max": 1000.0 }
//!     ]
//!   }
//! }
//! ```
//!
//! Sensors are given either as explicit `positions` rows or as a `grid`
//! (see `create_sensor_pos_array`), never both. Integrator `mode` defaults
//! to `static`. Calculators without a `seed` draw from OS entropy.
//!
//! ## Usage Example
//!
//! ```rust
//! use simsense_config::{from_json_str, IntegratorConfig};
//!
//! let config: IntegratorConfig = from_json_str(
//!     r#"{ "calculators": [{ "type": "rand_err_normal", "std": 0.5, "seed": 7 }] }"#,
//! )?;
//! let integrator = config.build((4, 1, 10), None)?;
//! assert_eq!(integrator.num_calcs(), 1);
//! # Ok::<(), simsense_config::ConfigError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod calculator;
pub mod sensor_array;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use simsense_core::SimSenseError;

pub use calculator::{CalculatorConfig, FieldContext, IntegratorConfig};
pub use sensor_array::{GridConfig, SensorArrayConfig};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-related errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    /// Configuration text is not valid JSON for the target type
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsed but describes an invalid model
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Calculator re-samples the field but no field was supplied
    #[error("Calculator '{calculator}' needs a field and sensor positions")]
    FieldRequired {
        /// Calculator type tag
        calculator: &'static str,
    },

    /// Core object construction failed
    #[error("{0}")]
    Core(#[from] SimSenseError),
}

/// Parse any configuration type from a JSON string
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> ConfigResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Parse any configuration type from a JSON file
pub fn from_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::info!("Loaded configuration from {}", path.display());
    from_json_str(&text)
}
