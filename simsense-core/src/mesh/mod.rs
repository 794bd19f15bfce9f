//! Unstructured Mesh and Shape-Function Interpolation
//!
//! ## Overview
//!
//! Sensors sit anywhere in the simulated domain, not just on nodes. Their
//! truth value comes from the same interpolation the solver used: find the
//! cell containing the sensor, evaluate that cell's shape functions at the
//! sensor, and weight the nodal values with them.
//!
//! ## Construction
//!
//! The mesh is built once from [`SimData`] geometry and connectivity:
//! 1. Every connectivity block is converted from 1-based to 0-based nodes
//! 2. The block's nodes-per-element picks a [`CellType`] (see [`cell`])
//! 3. A padded bounding box is stored per cell for the location prefilter
//!
//! ## Point Location
//!
//! ```text
//! for each cell whose padded box contains p:
//!     simplex  -> barycentric weights, accept if all >= -tol
//!     iso      -> Newton inverse map,  accept if all |ξ| <= 1 + tol
//! first accepted cell wins
//! ```
//!
//! Two-dimensional meshes live in the x-y plane; the z coordinate of a
//! sample point is ignored for them.
//!
//! Weights depend only on geometry, so they are computed once per point and
//! reused for every component and every time step.

pub mod cell;
pub(crate) mod shape;

use ndarray::{Array2, ArrayView1};

use crate::{
    constants::mesh::{BBOX_RELATIVE_PADDING, PARAMETRIC_TOLERANCE},
    errors::{SimSenseError, SimSenseResult},
    simdata::SimData,
};

pub use cell::{Cell, CellSelection, CellType};

use shape::{HEX_CORNERS, QUAD_CORNERS};

/// Interpolation weights of one sample point
#[derive(Debug, Clone, PartialEq)]
pub struct PointWeights {
    /// Index of the containing cell
    pub cell: usize,
    /// Mesh nodes contributing to the point
    pub nodes: Vec<usize>,
    /// Shape function value for each node, summing to one
    pub weights: Vec<f64>,
}

impl PointWeights {
    /// Interpolate a nodal column (one value per mesh node)
    pub fn apply(&self, node_values: ArrayView1<'_, f64>) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&node, &w)| w * node_values[node])
            .sum()
    }
}

/// Axis-aligned box, padded for the location prefilter
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: [f64; 3],
    max: [f64; 3],
}

/// Linear unstructured mesh with point location
#[derive(Debug, Clone)]
pub struct UnstructuredMesh {
    spat_dim: usize,
    points: Array2<f64>,
    cells: Vec<Cell>,
    bounds: Vec<Bounds>,
}

impl UnstructuredMesh {
    /// Build the mesh from simulation geometry and connectivity
    pub fn from_sim_data(sim_data: &SimData, spat_dim: usize) -> SimSenseResult<Self> {
        if sim_data.connect.is_empty() {
            return Err(SimSenseError::MissingConnectivity);
        }

        let mut cells = Vec::new();
        for (block, table) in &sim_data.connect {
            let (nodes_per_elem, num_elems) = table.dim();
            let selection = CellType::from_nodes_per_elem(nodes_per_elem, spat_dim);
            let cell_type = selection.cell_type;

            if selection.is_fallback {
                log::warn!(
                    "Block '{}': {} nodes per element not recognised in {}-D, interpolating as {:?}",
                    block, nodes_per_elem, spat_dim, cell_type
                );
            }
            if nodes_per_elem < cell_type.num_nodes() {
                return Err(SimSenseError::InvalidGeometry {
                    reason: format!(
                        "block '{}' has {} nodes per element, {:?} needs {}",
                        block,
                        nodes_per_elem,
                        cell_type,
                        cell_type.num_nodes()
                    ),
                });
            }

            for elem in 0..num_elems {
                let nodes = (0..cell_type.num_nodes())
                    .map(|n| {
                        table[[n, elem]].checked_sub(1).ok_or_else(|| {
                            SimSenseError::InvalidGeometry {
                                reason: format!("block '{}' uses node number 0", block),
                            }
                        })
                    })
                    .collect::<SimSenseResult<Vec<usize>>>()?;
                cells.push(Cell { cell_type, nodes });
            }
        }

        let mesh = Self::new(sim_data.coords.clone(), cells, spat_dim)?;
        log::info!(
            "Built {}-D mesh: {} nodes, {} cells",
            mesh.spat_dim,
            mesh.num_points(),
            mesh.num_cells()
        );
        Ok(mesh)
    }

    /// Build a mesh from 0-based cells
    pub fn new(points: Array2<f64>, cells: Vec<Cell>, spat_dim: usize) -> SimSenseResult<Self> {
        if points.ncols() != 3 {
            return Err(SimSenseError::InvalidGeometry {
                reason: format!("node coordinates need 3 columns, found {}", points.ncols()),
            });
        }

        let num_points = points.nrows();
        if let Some(bad) = cells
            .iter()
            .flat_map(|c| c.nodes.iter())
            .find(|&&n| n >= num_points)
        {
            return Err(SimSenseError::InvalidGeometry {
                reason: format!("cell references node {} of {}", bad + 1, num_points),
            });
        }

        let extent = (0..3)
            .map(|d| {
                let col = points.column(d);
                let lo = col.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                hi - lo
            })
            .filter(|e| e.is_finite())
            .fold(0.0, f64::max);
        let pad = BBOX_RELATIVE_PADDING * extent.max(1.0);

        let bounds = cells
            .iter()
            .map(|cell| {
                let mut min = [f64::INFINITY; 3];
                let mut max = [f64::NEG_INFINITY; 3];
                for &n in &cell.nodes {
                    for d in 0..3 {
                        min[d] = min[d].min(points[[n, d]] - pad);
                        max[d] = max[d].max(points[[n, d]] + pad);
                    }
                }
                Bounds { min, max }
            })
            .collect();

        Ok(Self {
            spat_dim,
            points,
            cells,
            bounds,
        })
    }

    /// Spatial dimension the mesh interpolates in
    pub fn spat_dim(&self) -> usize {
        self.spat_dim
    }

    /// Node coordinates (num_nodes, 3)
    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    /// Cells in block order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of nodes
    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    /// Number of cells
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Find the cell containing `point` and its interpolation weights
    pub fn locate(&self, point: [f64; 3]) -> Option<PointWeights> {
        self.cells
            .iter()
            .zip(&self.bounds)
            .enumerate()
            .filter(|(_, (cell, bounds))| {
                (0..cell.cell_type.dim())
                    .all(|d| point[d] >= bounds.min[d] && point[d] <= bounds.max[d])
            })
            .find_map(|(index, (cell, _))| {
                self.cell_weights(cell, point).map(|weights| PointWeights {
                    cell: index,
                    nodes: cell.nodes.clone(),
                    weights,
                })
            })
    }

    /// Interpolation weights for every row of `points` (n, 3)
    pub fn interpolation_weights(&self, points: &Array2<f64>) -> SimSenseResult<Vec<PointWeights>> {
        if points.ncols() != 3 {
            return Err(SimSenseError::shape_mismatch(
                &[points.nrows(), 3],
                points.shape(),
            ));
        }

        points
            .rows()
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let coords = [row[0], row[1], row[2]];
                self.locate(coords).ok_or_else(|| {
                    log::trace!("Point {} at {:?} not in any cell", index, coords);
                    SimSenseError::Sampling {
                        point: index,
                        coords,
                    }
                })
            })
            .collect()
    }

    fn vertices<const D: usize>(&self, cell: &Cell) -> Vec<[f64; D]> {
        cell.nodes
            .iter()
            .map(|&n| {
                let mut v = [0.0; D];
                for (d, vd) in v.iter_mut().enumerate() {
                    *vd = self.points[[n, d]];
                }
                v
            })
            .collect()
    }

    fn cell_weights(&self, cell: &Cell, point: [f64; 3]) -> Option<Vec<f64>> {
        let p2 = [point[0], point[1]];
        match cell.cell_type {
            CellType::Triangle => {
                shape::simplex_weights(&self.vertices::<2>(cell), p2).filter(|w| simplex_inside(w))
            }
            CellType::Tetra => {
                shape::simplex_weights(&self.vertices::<3>(cell), point).filter(|w| simplex_inside(w))
            }
            CellType::Quad => {
                let xi = shape::iso_inverse(&QUAD_CORNERS, &self.vertices::<2>(cell), p2)?;
                iso_inside(&xi).then(|| shape::iso_shape(&QUAD_CORNERS, xi))
            }
            CellType::Hexahedron => {
                let xi = shape::iso_inverse(&HEX_CORNERS, &self.vertices::<3>(cell), point)?;
                iso_inside(&xi).then(|| shape::iso_shape(&HEX_CORNERS, xi))
            }
        }
    }
}

fn simplex_inside(weights: &[f64]) -> bool {
    weights.iter().all(|&w| w >= -PARAMETRIC_TOLERANCE)
}

fn iso_inside(xi: &[f64]) -> bool {
    xi.iter().all(|x| x.abs() <= 1.0 + PARAMETRIC_TOLERANCE)
}
