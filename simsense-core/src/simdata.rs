//! Simulation data contract
//!
//! In-memory form of a mesh-based simulation result as handed over by an
//! external reader (Exodus, VTK, an analytic generator). The core only relies
//! on the shapes documented here, never on a file format.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

/// Read-only simulation result: mesh geometry plus nodal field histories
#[derive(Debug, Clone)]
pub struct SimData {
    /// Number of spatial dimensions the simulation was solved in (2 or 3)
    pub num_spat_dims: usize,

    /// Simulation time at each stored step, monotonically increasing
    pub time: Option<Array1<f64>>,

    /// Node coordinates, one row per node: (num_nodes, 3)
    pub coords: Array2<f64>,

    /// Connectivity tables by block name, each (nodes_per_elem, num_elems).
    /// Node numbers are 1-based as written by FE solvers.
    pub connect: BTreeMap<String, Array2<usize>>,

    /// Nodal variables by name, each (num_nodes, num_time_steps)
    pub node_vars: BTreeMap<String, Array2<f64>>,
}

impl SimData {
    /// Empty data set for the given number of spatial dimensions
    pub fn new(num_spat_dims: usize) -> Self {
        Self {
            num_spat_dims,
            time: None,
            coords: Array2::zeros((0, 3)),
            connect: BTreeMap::new(),
            node_vars: BTreeMap::new(),
        }
    }

    /// Number of mesh nodes
    pub fn num_nodes(&self) -> usize {
        self.coords.nrows()
    }

    /// Number of stored time steps, zero when there is no time vector
    pub fn num_time_steps(&self) -> usize {
        self.time.as_ref().map_or(0, |t| t.len())
    }

    /// Look up a nodal variable by name
    pub fn node_var(&self, name: &str) -> Option<&Array2<f64>> {
        self.node_vars.get(name)
    }
}
