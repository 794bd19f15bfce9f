//! Analytic simulation data
//!
//! Builds [`SimData`] on a regular 2-D quad mesh from closed-form field
//! functions. Useful wherever a real solver output is overkill: tests, demos,
//! and checking interpolation against a known answer.
//!
//! Node numbering runs along x first, then y. Elements are 4-node quads with
//! counter-clockwise, 1-based connectivity.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::simdata::SimData;

/// Closed-form field value f(x, y, t)
pub type AnalyticFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// Node coordinates (nodes, 3) and 1-based connectivity (4, elems) of a
/// rectangle `[0, length_x] × [0, length_y]` split into quads.
pub fn rectangle_mesh_2d(
    length_x: f64,
    length_y: f64,
    num_elem_x: usize,
    num_elem_y: usize,
) -> (Array2<f64>, Array2<usize>) {
    let nodes_x = num_elem_x + 1;
    let nodes_y = num_elem_y + 1;
    let xs = Array1::linspace(0.0, length_x, nodes_x);
    let ys = Array1::linspace(0.0, length_y, nodes_y);

    let coords = Array2::from_shape_fn((nodes_x * nodes_y, 3), |(node, axis)| match axis {
        0 => xs[node % nodes_x],
        1 => ys[node / nodes_x],
        _ => 0.0,
    });

    let connect = Array2::from_shape_fn((4, num_elem_x * num_elem_y), |(corner, elem)| {
        let ix = elem % num_elem_x;
        let iy = elem / num_elem_x;
        let (dx, dy) = match corner {
            0 => (0, 0),
            1 => (1, 0),
            2 => (1, 1),
            _ => (0, 1),
        };
        (iy + dy) * nodes_x + (ix + dx) + 1
    });

    (coords, connect)
}

/// Geometry, time steps and field functions of an analytic 2-D case
#[derive(Clone)]
pub struct AnalyticCaseData2D {
    /// Plate length along x
    pub length_x: f64,
    /// Plate length along y
    pub length_y: f64,
    /// Elements along x
    pub num_elem_x: usize,
    /// Elements along y
    pub num_elem_y: usize,
    /// Simulation time steps
    pub time_steps: Array1<f64>,
    /// Field key and its function, in insertion order
    pub fields: Vec<(String, AnalyticFn)>,
}

impl Default for AnalyticCaseData2D {
    fn default() -> Self {
        Self {
            length_x: 10.0,
            length_y: 7.5,
            num_elem_x: 4,
            num_elem_y: 3,
            time_steps: Array1::linspace(0.0, 10.0, 11),
            fields: Vec::new(),
        }
    }
}

impl fmt::Debug for AnalyticCaseData2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticCaseData2D")
            .field("length_x", &self.length_x)
            .field("length_y", &self.length_y)
            .field("num_elem_x", &self.num_elem_x)
            .field("num_elem_y", &self.num_elem_y)
            .field("time_steps", &self.time_steps)
            .field("fields", &self.fields.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

impl AnalyticCaseData2D {
    /// Add a field given as f(x, y, t)
    pub fn with_field<F>(mut self, key: &str, func: F) -> Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.fields.push((key.to_string(), Arc::new(func)));
        self
    }

    /// Add a separable field `(fx(x)·fy(y) + offset_space)·(ft(t) + offset_time)`
    pub fn with_separable_field<FX, FY, FT>(
        self,
        key: &str,
        fx: FX,
        fy: FY,
        ft: FT,
        offset_space: f64,
        offset_time: f64,
    ) -> Self
    where
        FX: Fn(f64) -> f64 + Send + Sync + 'static,
        FY: Fn(f64) -> f64 + Send + Sync + 'static,
        FT: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.with_field(key, move |x, y, t| {
            (fx(x) * fy(y) + offset_space) * (ft(t) + offset_time)
        })
    }

    /// Replace the time steps
    pub fn with_time_steps(mut self, time_steps: Array1<f64>) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Replace the plate size and element counts
    pub fn with_mesh(mut self, length_x: f64, length_y: f64, num_elem_x: usize, num_elem_y: usize) -> Self {
        self.length_x = length_x;
        self.length_y = length_y;
        self.num_elem_x = num_elem_x;
        self.num_elem_y = num_elem_y;
        self
    }
}

/// Evaluates an [`AnalyticCaseData2D`] on its mesh
#[derive(Debug, Clone)]
pub struct AnalyticSimDataGenerator {
    case_data: AnalyticCaseData2D,
    coords: Array2<f64>,
    connect: Array2<usize>,
}

impl AnalyticSimDataGenerator {
    /// Mesh the case geometry
    pub fn new(case_data: AnalyticCaseData2D) -> Self {
        let (coords, connect) = rectangle_mesh_2d(
            case_data.length_x,
            case_data.length_y,
            case_data.num_elem_x,
            case_data.num_elem_y,
        );
        Self { case_data, coords, connect }
    }

    /// Nodal values (nodes, time steps) of every field
    pub fn evaluate_fields(&self) -> Vec<(String, Array2<f64>)> {
        let times = &self.case_data.time_steps;
        self.case_data
            .fields
            .iter()
            .map(|(key, func)| {
                let values = Array2::from_shape_fn(
                    (self.coords.nrows(), times.len()),
                    |(node, step)| func(self.coords[[node, 0]], self.coords[[node, 1]], times[step]),
                );
                (key.clone(), values)
            })
            .collect()
    }

    /// Package mesh, times and evaluated fields as simulation data
    pub fn generate_sim_data(&self) -> SimData {
        let mut sim_data = SimData::new(2);
        sim_data.time = Some(self.case_data.time_steps.clone());
        sim_data.coords = self.coords.clone();
        sim_data
            .connect
            .insert("connect1".to_string(), self.connect.clone());
        sim_data.node_vars = self.evaluate_fields().into_iter().collect();
        sim_data
    }

    /// Node x and y coordinates reshaped to the (ny + 1, nx + 1) grid
    pub fn get_visualisation_grid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.case_data.num_elem_y + 1, self.case_data.num_elem_x + 1);
        let nodes_x = shape.1;
        let grid_x = Array2::from_shape_fn(shape, |(iy, ix)| self.coords[[iy * nodes_x + ix, 0]]);
        let grid_y = Array2::from_shape_fn(shape, |(iy, ix)| self.coords[[iy * nodes_x + ix, 1]]);
        (grid_x, grid_y)
    }
}
