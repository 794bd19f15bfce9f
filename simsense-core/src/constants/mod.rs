//! Constants for SimSense Core
//!
//! Numeric defaults used across the crate, grouped by domain:
//! - **Mesh**: point-location tolerances and inverse-mapping limits
//! - **Errors**: default parameters of the stock error models
//!
//! Use these instead of magic numbers. Names carry units where they have one.

/// Mesh interpolation tolerances and iteration limits.
pub mod mesh;

/// Default parameters for stock sensor error models.
pub mod errors;

pub use mesh::{
    PARAMETRIC_TOLERANCE, BBOX_RELATIVE_PADDING,
    NEWTON_MAX_ITERATIONS, NEWTON_CONVERGENCE_TOLERANCE,
};

pub use errors::{
    DEFAULT_ERR_PERCENT, THERMOCOUPLE_BITS_PER_UNIT,
    THERMOCOUPLE_MEAS_MIN, THERMOCOUPLE_MEAS_MAX,
};
