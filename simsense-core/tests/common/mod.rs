//! Common test utilities for integration tests
//!
//! This module provides:
//! - Analytic simulation fixtures with known closed-form truth
//! - Calculator builders with fixed seeds
//! - Tolerance assertions for floating point results

#![allow(dead_code)]

pub mod fixtures;

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

#[macro_export]
macro_rules! assert_arrays_close {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        assert_eq!($actual.shape(), $expected.shape(), "shape mismatch");
        for (a, e) in $actual.iter().zip($expected.iter()) {
            $crate::assert_within_tolerance!(*a, *e, $tolerance);
        }
    };
}
