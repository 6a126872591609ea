//! Mesh topology for stripification.
//!
//! Faces and edges live in two arenas addressed by compact integer handles;
//! the edges of each vertex are threaded into a singly-linked chain so that
//! the (at most two) faces incident on any edge can be found in amortized
//! O(1) from either endpoint.
//!
//! ## Edge uniqueness
//! The edge table stores a *set* of undirected edges: for any vertex pair
//! there is at most one entry, reachable from both endpoints' chains. A third
//! triangle claiming an already-full edge is logged and left out of the
//! adjacency structure.

pub mod edge;
pub mod face;
pub mod index;

pub use edge::{EdgeId, EdgeInfo};
pub use face::{FaceId, FaceInfo, Triangle};
pub use index::TopologyIndex;
