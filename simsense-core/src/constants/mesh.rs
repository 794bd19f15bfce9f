//! Mesh Interpolation Tolerances
//!
//! Point location maps a physical point into the parametric space of a cell
//! and accepts it when every parametric coordinate is inside the reference
//! element. Floating point round-off on shared faces means "inside" needs a
//! little slack.

// ===== POINT LOCATION =====

/// Slack on parametric coordinates when deciding if a point is inside a cell.
///
/// Applied to barycentric weights (must be >= -tol) and to isoparametric
/// coordinates (must be within [-1 - tol, 1 + tol]). Points sitting exactly on
/// a shared face or node are accepted by both neighbours; the first cell wins.
pub const PARAMETRIC_TOLERANCE: f64 = 1e-6;

/// Relative padding added to each cell bounding box before the exact test.
///
/// Scaled by the largest box extent so the prefilter never rejects a point
/// the parametric test would accept.
pub const BBOX_RELATIVE_PADDING: f64 = 1e-6;

// ===== INVERSE ISOPARAMETRIC MAPPING =====

/// Maximum Newton iterations when inverting the bilinear/trilinear map.
///
/// The map is exact after one step for parallelogram/parallelepiped cells;
/// distorted cells converge quadratically in a handful of steps.
pub const NEWTON_MAX_ITERATIONS: usize = 20;

/// Convergence threshold on the parametric update step.
pub const NEWTON_CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Determinant magnitude below which a Jacobian is treated as singular.
pub const SINGULAR_JACOBIAN_TOLERANCE: f64 = 1e-300;
