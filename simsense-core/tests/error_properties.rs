//! Property tests for error calculators and integrators

mod common;

use ndarray::Array3;
use proptest::prelude::*;
use simsense_core::{
    sensors::create_sensor_pos_array,
    uncertainty::{
        RandErrNormPercent, RandErrNormal, SysErrDigitisation, SysErrNormal, SysErrSaturation,
        SysErrUnifPercent, SysErrUniform,
    },
    ErrCalculator, ErrorIntegrator, IntegrationMode, PointSensorArray,
};

use common::fixtures::plate_field;

fn shape_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..6, 1usize..4, 1usize..8)
}

fn basis_strategy() -> impl Strategy<Value = Array3<f64>> {
    shape_strategy().prop_flat_map(|shape| {
        let len = shape.0 * shape.1 * shape.2;
        proptest::collection::vec(-500.0f64..500.0, len)
            .prop_map(move |v| Array3::from_shape_vec(shape, v).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_measurement_shape_invariant(
        nx in 1usize..4,
        ny in 1usize..4,
        num_times in 1usize..6,
        seed in any::<u64>(),
    ) {
        let positions = create_sensor_pos_array([nx, ny, 1], (0.0, 10.0), (0.0, 7.5), (0.0, 0.0));
        let times = ndarray::Array1::linspace(0.5, 9.5, num_times);
        let mut sensors = PointSensorArray::new(positions, plate_field(), Some(times)).unwrap();
        let shape = sensors.get_measurement_shape().unwrap();

        sensors.set_pre_sys_err_integrator(ErrorIntegrator::new(
            vec![Box::new(SysErrUnifPercent::new(-5.0, 5.0, Some(seed)).unwrap())],
            shape,
        ));
        sensors.set_rand_err_integrator(ErrorIntegrator::new(
            vec![Box::new(RandErrNormal::new(1.0, Some(seed ^ 1)).unwrap())],
            shape,
        ));

        let meas = sensors.get_measurements().unwrap();
        prop_assert_eq!(meas.dim(), (nx * ny, 1, num_times));
        prop_assert_eq!(meas.dim(), shape);
    }

    #[test]
    fn prop_systematic_constant_over_time(basis in basis_strategy(), seed in any::<u64>()) {
        let mut calcs: Vec<Box<dyn ErrCalculator>> = vec![
            Box::new(SysErrUniform::new(-3.0, 3.0, Some(seed)).unwrap()),
            Box::new(SysErrNormal::new(1.0, Some(seed)).unwrap()),
        ];
        for calc in calcs.iter_mut() {
            let errs = calc.calc_errs(&basis).unwrap();
            prop_assert_eq!(errs.dim(), basis.dim());
            for lane in errs.lanes(ndarray::Axis(2)) {
                prop_assert!(lane.iter().all(|&e| e == lane[0]));
            }
        }
    }

    #[test]
    fn prop_static_equals_recursive_for_basis_independent(
        basis in basis_strategy(),
        seed in any::<u64>(),
    ) {
        let build = || -> Vec<Box<dyn ErrCalculator>> {
            vec![
                Box::new(SysErrUniform::new(-1.0, 1.0, Some(seed)).unwrap()),
                Box::new(RandErrNormal::new(2.0, Some(seed.wrapping_add(7))).unwrap()),
            ]
        };
        let shape = basis.dim();
        let mut stat = ErrorIntegrator::new(build(), shape);
        let mut rec = ErrorIntegrator::new(build(), shape).with_mode(IntegrationMode::Recursive);

        let a = stat.calc_errs(&basis).unwrap().clone();
        let b = rec.calc_errs(&basis).unwrap().clone();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_static_differs_from_recursive_for_basis_dependent(
        seed in any::<u64>(),
        value in 10.0f64..100.0,
    ) {
        let build = || -> Vec<Box<dyn ErrCalculator>> {
            vec![
                Box::new(SysErrUniform::new(1.0, 2.0, Some(seed)).unwrap()),
                Box::new(RandErrNormPercent::new(5.0, Some(seed.wrapping_add(1))).unwrap()),
            ]
        };
        let basis = Array3::from_elem((2, 1, 4), value);
        let mut stat = ErrorIntegrator::new(build(), (2, 1, 4));
        let mut rec = ErrorIntegrator::new(build(), (2, 1, 4)).with_mode(IntegrationMode::Recursive);

        stat.calc_errs(&basis).unwrap();
        rec.calc_errs(&basis).unwrap();
        prop_assert_ne!(stat.get_errs_tot(), rec.get_errs_tot());
    }

    #[test]
    fn prop_percent_noise_scales_with_basis(
        seed in any::<u64>(),
        value in 1.0f64..1000.0,
    ) {
        let mut a = RandErrNormPercent::new(6.0, Some(seed)).unwrap();
        let mut b = RandErrNormPercent::new(6.0, Some(seed)).unwrap();
        let small = a.calc_errs(&Array3::from_elem((3, 2, 10), value)).unwrap();
        let large = b.calc_errs(&Array3::from_elem((3, 2, 10), 2.0 * value)).unwrap();
        for (s, l) in small.iter().zip(large.iter()) {
            prop_assert!((l - 2.0 * s).abs() <= 1e-9 * value.max(1.0));
        }
    }

    #[test]
    fn prop_digitisation_within_half_step(
        basis in basis_strategy(),
        bits_per_unit in 0.05f64..20.0,
    ) {
        let mut calc = SysErrDigitisation::new(bits_per_unit).unwrap();
        let errs = calc.calc_errs(&basis).unwrap();
        let half_step = 0.5 / bits_per_unit;
        prop_assert!(errs.iter().all(|e| e.abs() <= half_step * (1.0 + 1e-9)));
    }

    #[test]
    fn prop_saturation_stays_in_range(basis in basis_strategy()) {
        let mut calc = SysErrSaturation::new(-100.0, 100.0).unwrap();
        let errs = calc.calc_errs(&basis).unwrap();
        for (b, e) in basis.iter().zip(errs.iter()) {
            let clipped = b + e;
            prop_assert!((-100.0 - 1e-9..=100.0 + 1e-9).contains(&clipped));
        }
    }
}
