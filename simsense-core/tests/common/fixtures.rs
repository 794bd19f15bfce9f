//! Simulation fixtures with closed-form truth values

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::{array, Array1, Array2};
use simsense_core::{
    analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator},
    Field, SampleField, SimData,
};

/// Plate temperature: linear in space, ramping in time
pub fn plate_temperature(x: f64, y: f64, t: f64) -> f64 {
    20.0 + 4.0 * x + 2.0 * y + 5.0 * t
}

/// 10 × 7.5 plate, 4 × 3 quads, times 0..=10
pub fn plate_sim_data() -> SimData {
    let case = AnalyticCaseData2D::default()
        .with_field("temperature", plate_temperature)
        .with_field("disp_x", |x, _y, t| 1e-3 * x * t)
        .with_field("disp_y", |_x, y, t| -5e-4 * y * t);
    AnalyticSimDataGenerator::new(case).generate_sim_data()
}

/// Scalar temperature field on the plate
pub fn plate_field() -> Arc<dyn SampleField> {
    Arc::new(Field::scalar(&plate_sim_data(), "temperature", 2).expect("plate field"))
}

/// Displacement field on the plate
pub fn plate_disp_field() -> Arc<dyn SampleField> {
    Arc::new(
        Field::vector(&plate_sim_data(), "displacement", &["disp_x", "disp_y"], 2)
            .expect("plate displacement"),
    )
}

/// Interior sensor positions on the plate
pub fn plate_positions() -> Array2<f64> {
    array![
        [1.0, 1.0, 0.0],
        [3.0, 5.0, 0.0],
        [5.0, 3.75, 0.0],
        [9.0, 6.5, 0.0],
    ]
}

/// Unit cube split into eight hexahedra, f = 1 + x + 2y + 3z scaled by t
pub fn cube_sim_data() -> SimData {
    let n = 3;
    let lin = Array1::linspace(0.0, 1.0, n);
    let node = |i: usize, j: usize, k: usize| k * n * n + j * n + i;

    let mut coords = Array2::zeros((n * n * n, 3));
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let row = node(i, j, k);
                coords[[row, 0]] = lin[i];
                coords[[row, 1]] = lin[j];
                coords[[row, 2]] = lin[k];
            }
        }
    }

    let mut elems = Vec::new();
    for k in 0..n - 1 {
        for j in 0..n - 1 {
            for i in 0..n - 1 {
                elems.push([
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j + 1, k),
                    node(i, j + 1, k),
                    node(i, j, k + 1),
                    node(i + 1, j, k + 1),
                    node(i + 1, j + 1, k + 1),
                    node(i, j + 1, k + 1),
                ]);
            }
        }
    }
    let connect = Array2::from_shape_fn((8, elems.len()), |(c, e)| elems[e][c] + 1);

    let times = array![0.0, 1.0, 2.0];
    let values = Array2::from_shape_fn((coords.nrows(), times.len()), |(p, t)| {
        (1.0 + coords[[p, 0]] + 2.0 * coords[[p, 1]] + 3.0 * coords[[p, 2]]) * times[t]
    });

    let mut sim = SimData::new(3);
    sim.time = Some(times);
    sim.coords = coords;
    sim.connect = BTreeMap::from([("connect1".to_string(), connect)]);
    sim.node_vars.insert("temperature".to_string(), values);
    sim
}
