//! # mesh-strip
//!
//! mesh-strip is a Rust library for turning indexed triangle meshes into
//! GPU-friendly triangle strips. Given a flat index list and a target
//! post-transform vertex-cache size, it searches the mesh topology with a
//! round-based experiment heuristic, splits the committed strips into
//! cache-sized pieces, schedules the pieces for cache reuse, and emits
//! primitive groups: one stitched mega-strip (or one group per strip), plus
//! a leftover triangle list.
//!
//! ## Features
//! - Face/edge topology arenas with O(1) amortized edge-to-face lookup
//! - Experiment-driven strip discovery with degenerate swap turns
//! - Cache-aware splitting and reordering against a simulated vertex cache
//! - Winding-correct emission with stitching double-taps
//! - First-touch index remapping for vertex-buffer locality
//!
//! ## Usage
//! ```rust
//! use mesh_strip::prelude::*;
//!
//! # fn main() -> Result<(), MeshStripError> {
//! let indices = [0u32, 1, 2, 2, 1, 3];
//! let groups = generate_strips(&indices, &StripifyOptions::default())?;
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].kind, PrimitiveKind::Strip);
//! # Ok(())
//! # }
//! ```
//!
//! Diagnostics (non-manifold edges, derailed strip walks) go through the
//! [`log`] facade: install any logger to see them, or none to discard them.

// Re-export our major subsystems:
pub mod algs;
pub mod groups;
pub mod strip_error;
pub mod stripify;
pub mod topology;

/// A convenient prelude to import the most-used types and entry points:
pub mod prelude {
    pub use crate::groups::{remap_indices, PrimitiveGroup, PrimitiveKind};
    pub use crate::strip_error::MeshStripError;
    pub use crate::stripify::{
        generate_strips, StripifyOptions, CACHESIZE_GEFORCE1_2, CACHESIZE_GEFORCE3,
    };
    pub use crate::topology::{FaceId, TopologyIndex, Triangle};
}
