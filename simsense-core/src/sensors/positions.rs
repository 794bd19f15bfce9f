//! Sensor placement helpers

use ndarray::{s, Array1, Array2};

/// Evenly spaced coordinates strictly inside `lims`
fn interior_points(num: usize, lims: (f64, f64)) -> Array1<f64> {
    Array1::linspace(lims.0, lims.1, num + 2).slice(s![1..-1]).to_owned()
}

/// Regular grid of `n_sens[0] × n_sens[1] × n_sens[2]` sensors.
///
/// Each axis gets `n + 2` evenly spaced points over its limits with both ends
/// dropped, so no sensor sits on the domain boundary. Ordering is y outermost,
/// then x, then z. Equal limits place every sensor at that coordinate.
pub fn create_sensor_pos_array(
    n_sens: [usize; 3],
    x_lims: (f64, f64),
    y_lims: (f64, f64),
    z_lims: (f64, f64),
) -> Array2<f64> {
    let xs = interior_points(n_sens[0], x_lims);
    let ys = interior_points(n_sens[1], y_lims);
    let zs = interior_points(n_sens[2], z_lims);

    let mut positions = Array2::zeros((xs.len() * ys.len() * zs.len(), 3));
    let mut row = 0;
    for &y in &ys {
        for &x in &xs {
            for &z in &zs {
                positions[[row, 0]] = x;
                positions[[row, 1]] = y;
                positions[[row, 2]] = z;
                row += 1;
            }
        }
    }
    positions
}
