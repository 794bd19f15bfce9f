//! Cell topology selection
//!
//! FE solvers describe element blocks only by their nodes-per-element count.
//! The interpolation backend needs a concrete cell type, so the count is
//! mapped onto the four linear cells the mesh knows how to interpolate.
//!
//! ## Fallback policy
//!
//! | dim | nodes | cell        |
//! |-----|-------|-------------|
//! | 2   | 3     | Triangle    |
//! | 2   | 4     | Quad        |
//! | 2   | other | Quad        |
//! | 3   | 4     | Tetra       |
//! | 3   | 8     | Hexahedron  |
//! | 3   | other | Hexahedron  |
//!
//! Higher order blocks (QUAD8, HEX20, ...) therefore interpolate linearly
//! over their corner nodes. The fallback is reported to the caller so the
//! mesh builder can log it.

/// Linear cell types supported by the interpolation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    /// 3-node triangle (2-D)
    Triangle,
    /// 4-node bilinear quadrilateral (2-D)
    Quad,
    /// 4-node tetrahedron (3-D)
    Tetra,
    /// 8-node trilinear hexahedron (3-D)
    Hexahedron,
}

/// Outcome of mapping a nodes-per-element count to a cell type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSelection {
    /// Selected cell type
    pub cell_type: CellType,
    /// True when the count was not recognised and the default was used
    pub is_fallback: bool,
}

impl CellType {
    /// Pick the cell type for a block with `nodes_per_elem` nodes.
    ///
    /// Any `spat_dim` other than 2 is treated as 3-D.
    pub fn from_nodes_per_elem(nodes_per_elem: usize, spat_dim: usize) -> CellSelection {
        let (cell_type, is_fallback) = if spat_dim == 2 {
            match nodes_per_elem {
                3 => (CellType::Triangle, false),
                4 => (CellType::Quad, false),
                _ => (CellType::Quad, true),
            }
        } else {
            match nodes_per_elem {
                4 => (CellType::Tetra, false),
                8 => (CellType::Hexahedron, false),
                _ => (CellType::Hexahedron, true),
            }
        };

        CellSelection { cell_type, is_fallback }
    }

    /// Number of corner nodes used for interpolation
    pub fn num_nodes(&self) -> usize {
        match self {
            CellType::Triangle => 3,
            CellType::Quad | CellType::Tetra => 4,
            CellType::Hexahedron => 8,
        }
    }

    /// Parametric dimension of the cell
    pub fn dim(&self) -> usize {
        match self {
            CellType::Triangle | CellType::Quad => 2,
            CellType::Tetra | CellType::Hexahedron => 3,
        }
    }

    /// True for triangles and tetrahedra
    pub fn is_simplex(&self) -> bool {
        matches!(self, CellType::Triangle | CellType::Tetra)
    }
}

/// One mesh cell: its type and 0-based node indices in solver order
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Cell type used for interpolation
    pub cell_type: CellType,
    /// Node indices into the mesh point array
    pub nodes: Vec<usize>,
}
