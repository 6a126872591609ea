//! Edges and the per-vertex edge chains.
//!
//! Each undirected edge records its two endpoints, up to two incident faces,
//! and the continuation of the edge chain of each endpoint. An edge therefore
//! sits on exactly two chains at once; which `next` slot continues a given
//! chain depends on which endpoint slot holds the chain's vertex. The two
//! vertex slots are symmetric: there is no `v0 <= v1` normalization.

use super::face::FaceId;

/// Compact handle into the edge arena of a [`TopologyIndex`](super::TopologyIndex).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        EdgeId(index as u32)
    }

    /// Position of the edge in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An undirected edge with its (at most two) incident faces.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub v0: u32,
    pub v1: u32,
    pub face0: Option<FaceId>,
    pub face1: Option<FaceId>,
    /// Next edge on the chain of `v0`.
    pub next_v0: Option<EdgeId>,
    /// Next edge on the chain of `v1`.
    pub next_v1: Option<EdgeId>,
}

impl EdgeInfo {
    /// Continuation of the chain of vertex `v`, which must be an endpoint.
    #[inline]
    pub fn next_for(&self, v: u32) -> Option<EdgeId> {
        if self.v0 == v {
            self.next_v0
        } else {
            debug_assert_eq!(self.v1, v, "vertex {v} is not an endpoint of this edge");
            self.next_v1
        }
    }
}
