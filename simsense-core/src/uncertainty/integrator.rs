//! Error Integration
//!
//! ## Overview
//!
//! An [`ErrorIntegrator`] owns the calculators of one pipeline stage and
//! combines their outputs into a per-calculator breakdown of shape
//! (num_calcs, num_sensors, num_components, num_sample_times).
//!
//! ## Modes
//!
//! ```text
//! Static:     basis ──► calc_0 ──► e_0
//!             basis ──► calc_1 ──► e_1
//!
//! Recursive:  basis ──────────► calc_0 ──► e_0
//!             basis + e_0 ────► calc_1 ──► e_1
//!             basis + e_0 + e_1 ► calc_2 ──► e_2
//! ```
//!
//! In both modes the stage contribution is the sum over calculators. A fresh
//! breakdown is built on every call and only replaces the stored one once
//! every calculator has succeeded, so a failed call leaves the previous
//! result intact.

use ndarray::{Array3, Array4, Axis};

use crate::errors::{SimSenseError, SimSenseResult};

use super::{ErrCalculator, MeasShape};

/// How calculators of one stage see the basis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IntegrationMode {
    /// Every calculator sees the same basis
    #[default]
    Static,
    /// Each calculator sees the basis plus all earlier errors
    Recursive,
}

/// Ordered calculators for one error stage
#[derive(Debug)]
pub struct ErrorIntegrator {
    err_calcs: Vec<Box<dyn ErrCalculator>>,
    meas_shape: MeasShape,
    mode: IntegrationMode,
    errs_by_func: Array4<f64>,
}

impl ErrorIntegrator {
    /// Integrator for measurements of `meas_shape`, in static mode
    pub fn new(err_calcs: Vec<Box<dyn ErrCalculator>>, meas_shape: MeasShape) -> Self {
        let (s, c, t) = meas_shape;
        Self {
            errs_by_func: Array4::zeros((err_calcs.len(), s, c, t)),
            err_calcs,
            meas_shape,
            mode: IntegrationMode::Static,
        }
    }

    /// Set the composition mode
    pub fn with_mode(mut self, mode: IntegrationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the calculators, clearing the stored breakdown
    pub fn set_err_calcs(&mut self, err_calcs: Vec<Box<dyn ErrCalculator>>) {
        let (s, c, t) = self.meas_shape;
        self.errs_by_func = Array4::zeros((err_calcs.len(), s, c, t));
        self.err_calcs = err_calcs;
    }

    /// Composition mode
    pub fn mode(&self) -> IntegrationMode {
        self.mode
    }

    /// Measurement shape fixed at construction
    pub fn meas_shape(&self) -> MeasShape {
        self.meas_shape
    }

    /// Number of calculators
    pub fn num_calcs(&self) -> usize {
        self.err_calcs.len()
    }

    /// Compute the breakdown using the integrator's mode
    pub fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<&Array4<f64>> {
        match self.mode {
            IntegrationMode::Static => self.calc_errs_static(err_basis),
            IntegrationMode::Recursive => self.calc_errs_recursive(err_basis),
        }
    }

    /// Every calculator sees `err_basis`
    pub fn calc_errs_static(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<&Array4<f64>> {
        self.check_basis(err_basis)?;
        let mut errs_by_func = self.empty_breakdown();

        for (i, calc) in self.err_calcs.iter_mut().enumerate() {
            let errs = calc.calc_errs(err_basis)?;
            check_output(&**calc, self.meas_shape, &errs)?;
            errs_by_func.index_axis_mut(Axis(0), i).assign(&errs);
        }

        log::debug!("Static integration of {} calculators", self.err_calcs.len());
        self.errs_by_func = errs_by_func;
        Ok(&self.errs_by_func)
    }

    /// Each calculator sees `err_basis` plus every earlier calculator's errors
    pub fn calc_errs_recursive(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<&Array4<f64>> {
        self.check_basis(err_basis)?;
        let mut errs_by_func = self.empty_breakdown();
        let mut current = err_basis.clone();

        for (i, calc) in self.err_calcs.iter_mut().enumerate() {
            let errs = calc.calc_errs(&current)?;
            check_output(&**calc, self.meas_shape, &errs)?;
            current += &errs;
            errs_by_func.index_axis_mut(Axis(0), i).assign(&errs);
        }

        log::debug!("Recursive integration of {} calculators", self.err_calcs.len());
        self.errs_by_func = errs_by_func;
        Ok(&self.errs_by_func)
    }

    /// Breakdown from the most recent successful call
    pub fn get_errs_by_func(&self) -> &Array4<f64> {
        &self.errs_by_func
    }

    /// Stage contribution: sum of the breakdown over calculators
    pub fn get_errs_tot(&self) -> Array3<f64> {
        if self.err_calcs.is_empty() {
            let (s, c, t) = self.meas_shape;
            return Array3::zeros((s, c, t));
        }
        self.errs_by_func.sum_axis(Axis(0))
    }

    fn empty_breakdown(&self) -> Array4<f64> {
        let (s, c, t) = self.meas_shape;
        Array4::zeros((self.err_calcs.len(), s, c, t))
    }

    fn check_basis(&self, err_basis: &Array3<f64>) -> SimSenseResult<()> {
        if err_basis.dim() != self.meas_shape {
            let (s, c, t) = self.meas_shape;
            return Err(SimSenseError::shape_mismatch(&[s, c, t], err_basis.shape()));
        }
        Ok(())
    }
}

fn check_output(
    calc: &dyn ErrCalculator,
    meas_shape: MeasShape,
    errs: &Array3<f64>,
) -> SimSenseResult<()> {
    if errs.dim() != meas_shape {
        log::error!("{} returned {:?}, expected {:?}", calc.name(), errs.shape(), meas_shape);
        let (s, c, t) = meas_shape;
        return Err(SimSenseError::shape_mismatch(&[s, c, t], errs.shape()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uncertainty::{RandErrNormPercent, SysErrDigitisation, SysErrUniform};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Adds a fixed fraction of the basis
    #[derive(Debug)]
    struct Gain(f64);

    impl ErrCalculator for Gain {
        fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
            Ok(err_basis * self.0)
        }

        fn name(&self) -> &'static str {
            "Gain"
        }
    }

    /// Adds a constant
    #[derive(Debug)]
    struct Offset(f64);

    impl ErrCalculator for Offset {
        fn calc_errs(&mut self, err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
            Ok(Array3::from_elem(err_basis.dim(), self.0))
        }

        fn name(&self) -> &'static str {
            "Offset"
        }
    }

    /// Ignores the basis shape
    #[derive(Debug)]
    struct WrongShape;

    impl ErrCalculator for WrongShape {
        fn calc_errs(&mut self, _err_basis: &Array3<f64>) -> SimSenseResult<Array3<f64>> {
            Ok(Array3::zeros((1, 1, 1)))
        }

        fn name(&self) -> &'static str {
            "WrongShape"
        }
    }

    fn basis() -> Array3<f64> {
        array![[[10.0, 10.0, 10.0]], [[20.0, 20.0, 20.0]]]
    }

    #[test]
    fn static_sums_independent_errors() {
        let calcs: Vec<Box<dyn ErrCalculator>> = vec![Box::new(Offset(1.0)), Box::new(Gain(0.1))];
        let mut integ = ErrorIntegrator::new(calcs, (2, 1, 3));

        let by_func = integ.calc_errs(&basis()).unwrap();
        assert_eq!(by_func.dim(), (2, 2, 1, 3));
        assert_abs_diff_eq!(by_func[[1, 1, 0, 0]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(integ.get_errs_tot()[[0, 0, 2]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn recursive_feeds_earlier_errors_forward() {
        let calcs: Vec<Box<dyn ErrCalculator>> = vec![Box::new(Offset(1.0)), Box::new(Gain(0.1))];
        let mut integ =
            ErrorIntegrator::new(calcs, (2, 1, 3)).with_mode(IntegrationMode::Recursive);

        let by_func = integ.calc_errs(&basis()).unwrap();
        // gain sees 10 + 1
        assert_abs_diff_eq!(by_func[[1, 0, 0, 0]], 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(integ.get_errs_tot()[[1, 0, 0]], 1.0 + 2.1, epsilon = 1e-12);
    }

    #[test]
    fn modes_agree_for_basis_independent_errors() {
        let build = || -> Vec<Box<dyn ErrCalculator>> {
            vec![
                Box::new(SysErrUniform::new(-1.0, 1.0, Some(4)).unwrap()),
                Box::new(Offset(0.5)),
            ]
        };
        let mut stat = ErrorIntegrator::new(build(), (2, 1, 3));
        let mut rec = ErrorIntegrator::new(build(), (2, 1, 3)).with_mode(IntegrationMode::Recursive);

        let a = stat.calc_errs(&basis()).unwrap().clone();
        let b = rec.calc_errs(&basis()).unwrap();
        assert_eq!(&a, b);
    }

    #[test]
    fn no_calculators_gives_zero_total() {
        let mut integ = ErrorIntegrator::new(Vec::new(), (2, 1, 3));
        assert_eq!(integ.calc_errs(&basis()).unwrap().dim(), (0, 2, 1, 3));
        assert_eq!(integ.get_errs_tot(), Array3::zeros((2, 1, 3)));
    }

    #[test]
    fn basis_shape_mismatch_is_fatal() {
        let mut integ = ErrorIntegrator::new(vec![Box::new(Offset(1.0))], (3, 1, 3));
        let err = integ.calc_errs(&basis()).unwrap_err();
        assert_eq!(
            err,
            SimSenseError::ShapeMismatch { expected: vec![3, 1, 3], found: vec![2, 1, 3] }
        );
    }

    #[test]
    fn failed_call_keeps_previous_breakdown() {
        let mut integ = ErrorIntegrator::new(vec![Box::new(Offset(1.0))], (2, 1, 3));
        integ.calc_errs(&basis()).unwrap();
        integ.set_err_calcs(vec![Box::new(Offset(2.0)), Box::new(WrongShape)]);
        assert_eq!(integ.num_calcs(), 2);

        let zeros = integ.get_errs_by_func().clone();
        assert!(integ.calc_errs(&basis()).is_err());
        assert_eq!(integ.get_errs_by_func(), &zeros);
    }

    #[test]
    fn post_processing_chain() {
        let calcs: Vec<Box<dyn ErrCalculator>> = vec![
            Box::new(RandErrNormPercent::new(0.0, Some(1)).unwrap()),
            Box::new(SysErrDigitisation::new(1.0).unwrap()),
        ];
        let mut integ =
            ErrorIntegrator::new(calcs, (1, 1, 2)).with_mode(IntegrationMode::Recursive);
        integ.calc_errs(&array![[[1.4, 2.6]]]).unwrap();
        let tot = integ.get_errs_tot();
        assert_abs_diff_eq!(tot[[0, 0, 0]], -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(tot[[0, 0, 1]], 0.4, epsilon = 1e-12);
    }
}
