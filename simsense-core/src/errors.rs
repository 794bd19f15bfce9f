//! Error Types for Measurement Synthesis Failures
//!
//! ## Error Categories
//!
//! Errors fall into three groups, and every one of them is fatal for the call
//! that produced it. There is no retry and no partial result: a measurement
//! request either fully succeeds or fails outright.
//!
//! ### Configuration
//! Raised at construction or first use:
//! - `MissingTimeSteps`: simulation data carries no time vector
//! - `MissingComponent`: a requested named component is not in the data
//! - `MissingConnectivity`: no element connectivity table to build a mesh from
//! - `InvalidGeometry`: coordinates/connectivity that cannot form cells
//! - `ShapeMismatch`: an array does not match the measurement shape it must
//! - `FieldNotAttached`: measurements requested from an array with no field
//! - `InvalidTimes`: sample times that are not strictly increasing
//! - `InvalidParameter`: an error model parameter that cannot be drawn from
//!
//! ### Sampling
//! - `Sampling`: a point could not be located in any mesh cell
//!
//! ## Handling Strategy
//!
//! ```rust
//! use simsense_core::SimSenseError;
//!
//! fn describe(err: &SimSenseError) -> &'static str {
//!     match err {
//!         SimSenseError::Sampling { .. } => "sensor placed outside the simulated domain",
//!         SimSenseError::ShapeMismatch { .. } => "integrator built for another sensor array",
//!         _ => "invalid configuration",
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for measurement synthesis operations
pub type SimSenseResult<T> = Result<T, SimSenseError>;

/// Errors raised while building fields, sampling them or composing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimSenseError {
    /// Simulation data has no time vector
    #[error("Simulation data does not have time steps")]
    MissingTimeSteps,

    /// Named field component missing from the simulation data
    #[error("Field component '{name}' not found in simulation data")]
    MissingComponent {
        /// Component key that was requested
        name: String,
    },

    /// No connectivity table to build cells from
    #[error("Simulation data does not have a connectivity table")]
    MissingConnectivity,

    /// Coordinates or connectivity that cannot describe a mesh
    #[error("Invalid mesh geometry: {reason}")]
    InvalidGeometry {
        /// What was wrong with the input
        reason: String,
    },

    /// Array shape does not match the shape it is combined with
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape required by the receiver
        expected: Vec<usize>,
        /// Shape actually supplied
        found: Vec<usize>,
    },

    /// Point could not be resolved against the mesh
    #[error("Sample point {point} at {coords:?} is outside the mesh")]
    Sampling {
        /// Row index of the offending point
        point: usize,
        /// Coordinates of the offending point
        coords: [f64; 3],
    },

    /// Sensor array used before a field was attached
    #[error("No field attached to the sensor array")]
    FieldNotAttached,

    /// Time vector that is empty or not strictly increasing
    #[error("Invalid time vector: {reason}")]
    InvalidTimes {
        /// What was wrong with the times
        reason: &'static str,
    },

    /// Error model parameter that cannot be used
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl SimSenseError {
    /// Shorthand for a shape mismatch between two ndarray shapes
    pub fn shape_mismatch(expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// True for errors raised while configuring rather than sampling
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Sampling { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message() {
        let err = SimSenseError::shape_mismatch(&[2, 1, 3], &[2, 1, 1]);
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [2, 1, 3], found [2, 1, 1]"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn sampling_is_not_configuration() {
        let err = SimSenseError::Sampling {
            point: 4,
            coords: [10.0, 0.0, 0.0],
        };
        assert!(!err.is_configuration());
    }
}
