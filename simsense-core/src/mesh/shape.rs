//! Linear shape functions and their inverses
//!
//! ## Simplex cells
//!
//! For triangles and tetrahedra the barycentric weights solve
//! ```text
//! p - v0 = Σₖ λₖ (vₖ - v0),   w0 = 1 - Σₖ λₖ,   wₖ = λₖ
//! ```
//! which is a single D×D linear system.
//!
//! ## Isoparametric cells
//!
//! Quads and hexahedra use tensor-product shape functions on the reference
//! cube [-1, 1]^D:
//! ```text
//! Nᵢ(ξ) = Π_d (1 + ξ_d sᵢ_d) / 2
//! ```
//! with sᵢ the reference corner of node i. Locating a point means inverting
//! x(ξ) = Σᵢ Nᵢ(ξ) Xᵢ, done by Newton iteration from the cell centre.

use crate::constants::mesh::{
    NEWTON_CONVERGENCE_TOLERANCE, NEWTON_MAX_ITERATIONS, SINGULAR_JACOBIAN_TOLERANCE,
};

/// Reference corners of a 4-node quad, counter-clockwise
pub(crate) const QUAD_CORNERS: [[f64; 2]; 4] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Reference corners of an 8-node hexahedron: bottom face then top face
pub(crate) const HEX_CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Solve a small dense system with partial pivoting, `None` if singular
pub(crate) fn solve<const D: usize>(mut a: [[f64; D]; D], mut b: [f64; D]) -> Option<[f64; D]> {
    for col in 0..D {
        let pivot_row = (col..D).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot_row][col].abs() <= SINGULAR_JACOBIAN_TOLERANCE {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..D {
            let factor = a[row][col] / a[col][col];
            for k in col..D {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; D];
    for row in (0..D).rev() {
        let tail: f64 = ((row + 1)..D).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Barycentric weights of `p` in the simplex `verts` (D + 1 vertices)
pub(crate) fn simplex_weights<const D: usize>(verts: &[[f64; D]], p: [f64; D]) -> Option<Vec<f64>> {
    let origin = verts.first()?;
    let mut a = [[0.0; D]; D];
    let mut b = [0.0; D];
    for row in 0..D {
        for k in 0..D {
            a[row][k] = verts[k + 1][row] - origin[row];
        }
        b[row] = p[row] - origin[row];
    }

    let lambda = solve(a, b)?;
    let mut weights = Vec::with_capacity(D + 1);
    weights.push(1.0 - lambda.iter().sum::<f64>());
    weights.extend_from_slice(&lambda);
    Some(weights)
}

/// Tensor-product shape function values at `xi`
pub(crate) fn iso_shape<const D: usize>(corners: &[[f64; D]], xi: [f64; D]) -> Vec<f64> {
    corners
        .iter()
        .map(|s| (0..D).map(|d| 0.5 * (1.0 + xi[d] * s[d])).product())
        .collect()
}

/// Shape function gradients with respect to `xi`
fn iso_grad<const D: usize>(corners: &[[f64; D]], xi: [f64; D]) -> Vec<[f64; D]> {
    corners
        .iter()
        .map(|s| {
            let mut grad = [0.0; D];
            for (b, g) in grad.iter_mut().enumerate() {
                *g = (0..D)
                    .map(|d| {
                        if d == b {
                            0.5 * s[d]
                        } else {
                            0.5 * (1.0 + xi[d] * s[d])
                        }
                    })
                    .product();
            }
            grad
        })
        .collect()
}

/// Parametric coordinates of `p` in an isoparametric cell, `None` when the
/// Newton iteration fails to converge or hits a singular Jacobian.
pub(crate) fn iso_inverse<const D: usize>(
    corners: &[[f64; D]],
    verts: &[[f64; D]],
    p: [f64; D],
) -> Option<[f64; D]> {
    let mut xi = [0.0; D];

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let shape = iso_shape(corners, xi);
        let grad = iso_grad(corners, xi);

        let mut residual = [0.0; D];
        let mut jacobian = [[0.0; D]; D];
        for (i, vert) in verts.iter().enumerate() {
            for a in 0..D {
                residual[a] += shape[i] * vert[a];
                for b in 0..D {
                    jacobian[a][b] += grad[i][b] * vert[a];
                }
            }
        }
        for a in 0..D {
            residual[a] = p[a] - residual[a];
        }

        let step = solve(jacobian, residual)?;
        let mut step_norm: f64 = 0.0;
        for d in 0..D {
            xi[d] += step[d];
            step_norm = step_norm.max(step[d].abs());
        }
        if step_norm < NEWTON_CONVERGENCE_TOLERANCE {
            return Some(xi);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn solve_3x3() {
        let a = [[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let b = [8.0, -11.0, -3.0];
        let x = solve(a, b).unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn solve_singular() {
        assert!(solve([[1.0, 2.0], [2.0, 4.0]], [1.0, 1.0]).is_none());
    }

    #[test]
    fn triangle_centroid_weights() {
        let verts = [[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]];
        let w = simplex_weights(&verts, [1.0, 1.0]).unwrap();
        for wi in w {
            assert_abs_diff_eq!(wi, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn shape_functions_partition_unity() {
        let w = iso_shape(&HEX_CORNERS, [0.3, -0.7, 0.1]);
        assert_abs_diff_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn quad_inverse_on_distorted_cell() {
        let verts = [[0.0, 0.0], [2.0, 0.0], [2.5, 1.5], [0.0, 1.0]];
        let xi_true = [0.25, -0.4];
        let shape = iso_shape(&QUAD_CORNERS, xi_true);
        let mut p = [0.0; 2];
        for (i, v) in verts.iter().enumerate() {
            p[0] += shape[i] * v[0];
            p[1] += shape[i] * v[1];
        }

        let xi = iso_inverse(&QUAD_CORNERS, &verts, p).unwrap();
        assert_abs_diff_eq!(xi[0], xi_true[0], epsilon = 1e-10);
        assert_abs_diff_eq!(xi[1], xi_true[1], epsilon = 1e-10);
    }
}
