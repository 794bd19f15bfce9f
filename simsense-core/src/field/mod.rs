//! Simulation Fields
//!
//! ## Overview
//!
//! A [`Field`] wraps one physical quantity of a simulation result: a scalar
//! (temperature), a vector (displacement) or a tensor (strain). It owns the
//! interpolation mesh and the nodal histories of the components it serves,
//! and answers one question: what was the value at these points at these
//! times?
//!
//! ## Sampling
//!
//! ```text
//! points (n, 3) ──► mesh shape functions ──► (n, components, sim steps)
//!                                                   │
//!                          times given? ── no ──────┤
//!                               │ yes               │
//!                               ▼                   ▼
//!                    linear time interp   (n, components, times)
//! ```
//!
//! Spatial weights are computed once per call and reused for every
//! component and every simulation step. Both stages are pure functions of
//! their inputs, so identical requests give bit-identical results.
//!
//! ## Usage Example
//!
//! ```rust
//! use ndarray::array;
//! use simsense_core::analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator};
//! use simsense_core::field::{Field, SampleField};
//!
//! let case = AnalyticCaseData2D::default()
//!     .with_field("temperature", |x, _y, t| 20.0 + x * t);
//! let sim_data = AnalyticSimDataGenerator::new(case).generate_sim_data();
//!
//! let field = Field::scalar(&sim_data, "temperature", 2)?;
//! let truth = field.sample_field(&array![[1.0, 2.0, 0.0]], Some(&array![0.5]))?;
//! assert_eq!(truth.dim(), (1, 1, 1));
//! # Ok::<(), simsense_core::SimSenseError>(())
//! ```

mod interp;

use std::fmt;

use ndarray::{Array1, Array2, Array3};

use crate::{
    errors::{SimSenseError, SimSenseResult},
    mesh::UnstructuredMesh,
    simdata::SimData,
};

pub use interp::{check_times, interp_linear, resample_traces};

/// Anything that can be sampled in space and time like a simulation field.
///
/// Implemented by [`Field`]; error calculators and sensor arrays only talk to
/// this trait so tests and alternative backends can stand in for a mesh.
pub trait SampleField: Send + Sync + fmt::Debug {
    /// Sample every component at `points` (n, 3).
    ///
    /// Returns (n, num_components, num_times) where the time axis is the
    /// native simulation steps when `times` is `None`.
    fn sample_field(
        &self,
        points: &Array2<f64>,
        times: Option<&Array1<f64>>,
    ) -> SimSenseResult<Array3<f64>>;

    /// Native simulation time vector
    fn get_time_steps(&self) -> &Array1<f64>;

    /// Component keys in measurement order
    fn get_all_components(&self) -> &[String];

    /// Index of a component along the measurement component axis
    fn get_component_index(&self, component: &str) -> Option<usize> {
        self.get_all_components().iter().position(|c| c == component)
    }

    /// Number of components
    fn num_components(&self) -> usize {
        self.get_all_components().len()
    }
}

/// Physical rank of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// Single component
    Scalar,
    /// One component per displacement direction
    Vector,
    /// Normal components followed by deviatoric (shear) components
    Tensor {
        /// How many of the leading components are normal
        num_normal: usize,
    },
}

/// Mesh-backed simulation field
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    components: Vec<String>,
    mesh: UnstructuredMesh,
    node_values: Vec<Array2<f64>>,
    time_steps: Array1<f64>,
}

impl Field {
    /// Build a field serving `components` from `sim_data`
    pub fn new(
        sim_data: &SimData,
        name: &str,
        components: &[&str],
        kind: FieldKind,
        spat_dim: usize,
    ) -> SimSenseResult<Self> {
        let time_steps = sim_data
            .time
            .clone()
            .ok_or(SimSenseError::MissingTimeSteps)?;
        check_times(&time_steps)?;

        let expected = [sim_data.num_nodes(), time_steps.len()];
        let node_values = components
            .iter()
            .map(|&comp| {
                let values = sim_data
                    .node_var(comp)
                    .ok_or_else(|| SimSenseError::MissingComponent { name: comp.to_string() })?;
                if values.shape() != expected {
                    return Err(SimSenseError::shape_mismatch(&expected, values.shape()));
                }
                Ok(values.clone())
            })
            .collect::<SimSenseResult<Vec<_>>>()?;

        let mesh = UnstructuredMesh::from_sim_data(sim_data, spat_dim)?;

        log::info!(
            "Field '{}' ({:?}): {} components over {} time steps",
            name,
            kind,
            components.len(),
            time_steps.len()
        );

        Ok(Self {
            name: name.to_string(),
            kind,
            components: components.iter().map(|c| c.to_string()).collect(),
            mesh,
            node_values,
            time_steps,
        })
    }

    /// Single-component field keyed by `field_key`
    pub fn scalar(sim_data: &SimData, field_key: &str, spat_dim: usize) -> SimSenseResult<Self> {
        Self::new(sim_data, field_key, &[field_key], FieldKind::Scalar, spat_dim)
    }

    /// Vector field over the given component keys
    pub fn vector(
        sim_data: &SimData,
        name: &str,
        components: &[&str],
        spat_dim: usize,
    ) -> SimSenseResult<Self> {
        Self::new(sim_data, name, components, FieldKind::Vector, spat_dim)
    }

    /// Tensor field: normal components then deviatoric components
    pub fn tensor(
        sim_data: &SimData,
        name: &str,
        normal_components: &[&str],
        dev_components: &[&str],
        spat_dim: usize,
    ) -> SimSenseResult<Self> {
        let components: Vec<&str> = normal_components
            .iter()
            .chain(dev_components)
            .copied()
            .collect();
        Self::new(
            sim_data,
            name,
            &components,
            FieldKind::Tensor { num_normal: normal_components.len() },
            spat_dim,
        )
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field rank
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Interpolation mesh, for rendering the simulation domain
    pub fn get_mesh(&self) -> &UnstructuredMesh {
        &self.mesh
    }

    /// Nodal history (num_nodes, num_time_steps) of one component
    pub fn node_values(&self, component: &str) -> Option<&Array2<f64>> {
        self.get_component_index(component)
            .map(|index| &self.node_values[index])
    }
}

impl SampleField for Field {
    fn sample_field(
        &self,
        points: &Array2<f64>,
        times: Option<&Array1<f64>>,
    ) -> SimSenseResult<Array3<f64>> {
        let weights = self.mesh.interpolation_weights(points)?;

        let num_steps = self.time_steps.len();
        let mut at_sim_times = Array3::zeros((points.nrows(), self.components.len(), num_steps));
        for (comp, values) in self.node_values.iter().enumerate() {
            for step in 0..num_steps {
                let column = values.column(step);
                for (point, w) in weights.iter().enumerate() {
                    at_sim_times[[point, comp, step]] = w.apply(column);
                }
            }
        }

        Ok(match times {
            Some(times) => resample_traces(&at_sim_times, &self.time_steps, times),
            None => at_sim_times,
        })
    }

    fn get_time_steps(&self) -> &Array1<f64> {
        &self.time_steps
    }

    fn get_all_components(&self) -> &[String] {
        &self.components
    }
}
