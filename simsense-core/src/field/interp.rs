//! Temporal resampling of sampled traces
//!
//! Linear interpolation with end clamping: a requested time before the first
//! simulation step takes the first value, one after the last step takes the
//! last value. No extrapolation.

use ndarray::{Array1, Array3, ArrayView1, Axis};

use crate::errors::{SimSenseError, SimSenseResult};

/// Linearly interpolate `fp(xp)` at `x`, clamping outside `xp`.
///
/// `xp` must be increasing.
///
/// # Panics
///
/// Panics if `xp` is empty. [`check_times`] rejects such time vectors
/// before any field is sampled.
pub fn interp_linear(x: f64, xp: ArrayView1<'_, f64>, fp: ArrayView1<'_, f64>) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    let (mut lo, mut hi) = (0, last);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xp[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let frac = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + frac * (fp[hi] - fp[lo])
}

/// Resample every (point, component) trace along the last axis
pub fn resample_traces(
    traces: &Array3<f64>,
    trace_times: &Array1<f64>,
    sample_times: &Array1<f64>,
) -> Array3<f64> {
    let (n_pts, n_comps, _) = traces.dim();
    let mut out = Array3::zeros((n_pts, n_comps, sample_times.len()));

    for (trace, mut resampled) in traces
        .lanes(Axis(2))
        .into_iter()
        .zip(out.lanes_mut(Axis(2)))
    {
        for (dst, &t) in resampled.iter_mut().zip(sample_times) {
            *dst = interp_linear(t, trace_times.view(), trace);
        }
    }

    out
}

/// Check a time vector is non-empty, finite and strictly increasing
pub fn check_times(times: &Array1<f64>) -> SimSenseResult<()> {
    if times.is_empty() {
        return Err(SimSenseError::InvalidTimes { reason: "no time values" });
    }
    if times.iter().any(|t| !t.is_finite()) {
        return Err(SimSenseError::InvalidTimes { reason: "non-finite time value" });
    }
    if times.windows(2).into_iter().any(|w| w[1] <= w[0]) {
        return Err(SimSenseError::InvalidTimes { reason: "times must be strictly increasing" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn interpolates_between_steps() {
        let xp = array![0.0, 1.0, 3.0];
        let fp = array![0.0, 10.0, 30.0];
        assert_eq!(interp_linear(0.5, xp.view(), fp.view()), 5.0);
        assert_eq!(interp_linear(2.0, xp.view(), fp.view()), 20.0);
        assert_eq!(interp_linear(3.0, xp.view(), fp.view()), 30.0);
    }

    #[test]
    fn clamps_outside_range() {
        let xp = array![1.0, 2.0];
        let fp = array![4.0, 8.0];
        assert_eq!(interp_linear(-5.0, xp.view(), fp.view()), 4.0);
        assert_eq!(interp_linear(9.0, xp.view(), fp.view()), 8.0);
    }

    #[test]
    #[should_panic]
    fn empty_steps_panic() {
        let empty: Array1<f64> = Array1::zeros(0);
        interp_linear(0.0, empty.view(), empty.view());
    }

    #[test]
    fn resample_keeps_lane_identity() {
        let traces = array![[[0.0, 2.0], [1.0, 1.0]], [[10.0, 20.0], [5.0, 7.0]]];
        let out = resample_traces(&traces, &array![0.0, 1.0], &array![0.5]);
        assert_eq!(out, array![[[1.0], [1.0]], [[15.0], [6.0]]]);
    }

    #[test]
    fn rejects_repeated_times() {
        assert!(check_times(&array![0.0, 1.0, 1.0]).is_err());
        assert!(check_times(&Array1::zeros(0)).is_err());
        assert!(check_times(&array![0.0, 0.5, 2.0]).is_ok());
    }
}
