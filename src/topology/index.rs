//! Topology construction and adjacency queries.
//!
//! [`TopologyIndex`] owns the face and edge arenas for the lifetime of one
//! stripification call. Construction scans the input triangle list once:
//! degenerate input triangles are discarded, each face is wired onto the
//! three per-vertex edge chains of its corners, and an exact duplicate of an
//! already-seen face is dropped again, undoing the `face1` assignments the
//! scan just made for it. Duplicate detection can only fire
//! when all three edges pre-existed, which is why edge creation and the undo
//! bookkeeping are interleaved the way they are; do not reorder them.
//!
//! More than two faces on one edge is a warning, not an error: the extra
//! face keeps its slot in the face arena but is invisible to adjacency.

use super::edge::{EdgeId, EdgeInfo};
use super::face::{FaceId, FaceInfo, Triangle};

/// Face/edge arenas plus the per-vertex edge chain heads.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    pub faces: Vec<FaceInfo>,
    pub edges: Vec<EdgeInfo>,
    heads: Vec<Option<EdgeId>>,
}

impl TopologyIndex {
    /// Build the face and edge tables from a flat index list.
    ///
    /// `max_index` is the largest vertex id occurring in `indices`; the
    /// per-vertex chain table is sized `max_index + 1`.
    pub fn build(indices: &[u32], max_index: usize) -> Self {
        let mut topo = TopologyIndex {
            faces: Vec::with_capacity(indices.len() / 3),
            edges: Vec::new(),
            heads: vec![None; max_index + 1],
        };

        for tri in indices.chunks_exact(3) {
            let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
            if Triangle::new(v0, v1, v2).is_degenerate() {
                continue;
            }

            // Candidate handle if this face survives deduplication.
            let face = FaceId::new(topo.faces.len());

            // If every edge already existed, an identical face may too.
            let mut might_already_exist = true;
            let mut face_updated = [false; 3];
            let mut face_edges = [EdgeId::new(0); 3];

            for (slot, (a, b)) in [(v0, v1), (v1, v2), (v2, v0)].into_iter().enumerate() {
                match topo.find_edge(a, b) {
                    None => {
                        might_already_exist = false;
                        let edge = EdgeId::new(topo.edges.len());
                        topo.edges.push(EdgeInfo {
                            v0: a,
                            v1: b,
                            face0: Some(face),
                            face1: None,
                            next_v0: topo.heads[a as usize],
                            next_v1: topo.heads[b as usize],
                        });
                        topo.heads[a as usize] = Some(edge);
                        topo.heads[b as usize] = Some(edge);
                        face_edges[slot] = edge;
                    }
                    Some(edge) => {
                        face_edges[slot] = edge;
                        let info = &mut topo.edges[edge.index()];
                        if info.face1.is_some() {
                            log::warn!(
                                "non-manifold edge ({a}, {b}): more than two incident \
                                 triangles; the extra one is ignored for adjacency"
                            );
                        } else {
                            info.face1 = Some(face);
                            face_updated[slot] = true;
                        }
                    }
                }
            }

            if might_already_exist && topo.already_exists(v0, v1, v2) {
                // Drop the duplicate and unhook it from the edges it touched.
                for slot in 0..3 {
                    if face_updated[slot] {
                        topo.edges[face_edges[slot].index()].face1 = None;
                    }
                }
            } else {
                topo.faces.push(FaceInfo::new(v0, v1, v2));
            }
        }

        topo
    }

    /// Look up the undirected edge `(v0, v1)` by walking either endpoint's
    /// chain; the chains are symmetric, so walking `v0`'s suffices.
    pub fn find_edge(&self, v0: u32, v1: u32) -> Option<EdgeId> {
        let mut iter = self.heads.get(v0 as usize).copied().flatten();
        while let Some(id) = iter {
            let edge = &self.edges[id.index()];
            if edge.v0 == v0 {
                if edge.v1 == v1 {
                    return Some(id);
                }
                iter = edge.next_v0;
            } else {
                debug_assert_eq!(edge.v1, v0);
                if edge.v0 == v1 {
                    return Some(id);
                }
                iter = edge.next_v1;
            }
        }
        None
    }

    /// The face across edge `(v0, v1)` from `exclude`.
    ///
    /// `exclude` is `None` when the probing face is a synthesized filler that
    /// has no arena identity; it then never matches either incident slot.
    /// A missing edge with `v0 == v1` is a degenerate probe and resolves to
    /// no face.
    pub fn other_face(&self, v0: u32, v1: u32, exclude: Option<FaceId>) -> Option<FaceId> {
        let Some(id) = self.find_edge(v0, v1) else {
            debug_assert_eq!(v0, v1, "edge ({v0}, {v1}) missing from the topology");
            return None;
        };
        let edge = &self.edges[id.index()];
        if exclude.is_some() && edge.face0 == exclude {
            edge.face1
        } else {
            edge.face0
        }
    }

    /// Number of edges of `tri` with a face on the far side.
    pub fn num_neighbors(&self, tri: Triangle, exclude: Option<FaceId>) -> usize {
        tri.edges()
            .into_iter()
            .filter(|&(a, b)| self.other_face(a, b, exclude).is_some())
            .count()
    }

    /// The edge `(a, b)` of a face known to be in the arena.
    pub(crate) fn face_edge(&self, a: u32, b: u32) -> EdgeId {
        self.find_edge(a, b)
            .expect("arena faces always have their three edges in the edge table")
    }

    /// Head of the edge chain of vertex `v`.
    #[inline]
    pub(crate) fn chain_head(&self, v: u32) -> Option<EdgeId> {
        self.heads.get(v as usize).copied().flatten()
    }

    fn already_exists(&self, v0: u32, v1: u32, v2: u32) -> bool {
        self.faces
            .iter()
            .any(|f| f.v0 == v0 && f.v1 == v1 && f.v2 == v2)
    }
}
