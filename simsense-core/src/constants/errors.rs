//! Default Error Model Parameters
//!
//! Stock values used by the sensor array factory. They describe a generic
//! lab thermocouple chain rather than any particular datasheet.

// ===== BASIC ERRORS =====

/// Default percentage error for the basic error chain (%).
///
/// Used both as the half-width of the uniform systematic offset and as the
/// standard deviation of the random noise.
pub const DEFAULT_ERR_PERCENT: f64 = 6.0;

// ===== THERMOCOUPLE POST-PROCESSING =====

/// Digitisation resolution of the thermocouple logger (bits per unit).
///
/// 1/5 bits per degree means readings are quantised to 5 degree steps.
pub const THERMOCOUPLE_BITS_PER_UNIT: f64 = 1.0 / 5.0;

/// Lower saturation limit of the thermocouple logger (degC).
pub const THERMOCOUPLE_MEAS_MIN: f64 = 0.0;

/// Upper saturation limit of the thermocouple logger (degC).
pub const THERMOCOUPLE_MEAS_MAX: f64 = 1000.0;
