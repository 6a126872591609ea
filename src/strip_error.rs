//! `MeshStripError`: unified error type for the mesh-strip public APIs.
//!
//! Only caller-input violations are errors. Geometry anomalies discovered
//! while stripifying (non-manifold edges, derailed strip walks) are reported
//! through the `log` facade and the engine degrades gracefully instead of
//! failing.

use thiserror::Error;

/// Unified error type for mesh-strip operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshStripError {
    /// The input index list does not describe whole triangles.
    #[error("index count {0} is not a multiple of three")]
    IndexCountNotTriangular(usize),
    /// A group index exceeds the declared vertex-buffer size during remapping.
    #[error("index {index} is out of range for a vertex buffer of {num_verts} vertices")]
    IndexOutOfRange { index: u32, num_verts: usize },
}
