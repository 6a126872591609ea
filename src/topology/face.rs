//! Faces and vertex triples.
//!
//! A [`FaceInfo`] is a triangle of the input mesh held in the topology arena,
//! addressed by a compact [`FaceId`] handle. Alongside its vertices it carries
//! the search state used while growing strips: the id of the committed strip
//! that owns it, and the `(experiment_id, test_strip_id)` pair that scopes a
//! provisional claim to one in-flight experiment.
//!
//! [`Triangle`] is the plain vertex triple shared by faces, synthesized swap
//! fillers and the emitter; the winding and shared-vertex queries the
//! stripifier relies on live here.

/// Compact handle into the face arena of a [`TopologyIndex`](super::TopologyIndex).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct FaceId(u32);

impl FaceId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        FaceId(index as u32)
    }

    /// Position of the face in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An unordered vertex triple in the caller's index space.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl Triangle {
    #[inline]
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Triangle { v0, v1, v2 }
    }

    /// True if any two vertices coincide (zero-area triangle).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.v0 == self.v1 || self.v0 == self.v2 || self.v1 == self.v2
    }

    /// The three undirected edges in cyclic order.
    #[inline]
    pub fn edges(&self) -> [(u32, u32); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    #[inline]
    pub fn contains(&self, v: u32) -> bool {
        self.v0 == v || self.v1 == v || self.v2 == v
    }

    /// The first vertex of `self` that does not appear in `other`, if any.
    ///
    /// Degenerate bridge triangles share their whole vertex set with the
    /// rolling strip tail, which is exactly the `None` case the emitter keys
    /// its winding flips on.
    pub fn unique_vertex_not_in(&self, other: Triangle) -> Option<u32> {
        if !other.contains(self.v0) {
            return Some(self.v0);
        }
        if !other.contains(self.v1) {
            return Some(self.v1);
        }
        if !other.contains(self.v2) {
            return Some(self.v2);
        }
        None
    }

    /// The (at most two) vertices of `self` also present in `other`, reported
    /// in `self`'s vertex order.
    pub fn shared_vertices_with(&self, other: Triangle) -> (Option<u32>, Option<u32>) {
        let mut first = None;
        for v in [self.v0, self.v1, self.v2] {
            if other.contains(v) {
                if first.is_none() {
                    first = Some(v);
                } else {
                    return (first, Some(v));
                }
            }
        }
        (first, None)
    }

    /// Whether `v0 -> v1` is a forward edge of this triangle's stored cycle.
    ///
    /// This is the winding test the emitter uses: matching the stored cycle
    /// means the face renders clockwise when issued starting at `v0`.
    pub fn is_cw(&self, v0: u32, v1: u32) -> bool {
        if self.v0 == v0 {
            return self.v1 == v1;
        }
        if self.v1 == v0 {
            return self.v2 == v1;
        }
        self.v0 == v1
    }
}

/// A mesh triangle plus the claim state used during strip discovery.
#[derive(Debug, Clone)]
pub struct FaceInfo {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
    /// Id of the committed strip owning this face; -1 while unassigned.
    pub strip_id: i32,
    /// Strip id of a provisional claim, scoped by `experiment_id`.
    pub test_strip_id: i32,
    /// Experiment that last wrote `test_strip_id`; -1 means no claim.
    pub experiment_id: i32,
}

impl FaceInfo {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        FaceInfo {
            v0,
            v1,
            v2,
            strip_id: -1,
            test_strip_id: -1,
            experiment_id: -1,
        }
    }

    #[inline]
    pub fn tri(&self) -> Triangle {
        Triangle::new(self.v0, self.v1, self.v2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degeneracy() {
        assert!(Triangle::new(1, 1, 2).is_degenerate());
        assert!(Triangle::new(1, 2, 1).is_degenerate());
        assert!(Triangle::new(2, 1, 1).is_degenerate());
        assert!(!Triangle::new(0, 1, 2).is_degenerate());
    }

    #[test]
    fn unique_vertex() {
        let a = Triangle::new(0, 1, 2);
        let b = Triangle::new(2, 1, 3);
        assert_eq!(b.unique_vertex_not_in(a), Some(3));
        assert_eq!(a.unique_vertex_not_in(b), Some(0));
        assert_eq!(a.unique_vertex_not_in(a), None);
    }

    #[test]
    fn shared_vertices_in_self_order() {
        let a = Triangle::new(0, 1, 2);
        let b = Triangle::new(2, 1, 3);
        assert_eq!(b.shared_vertices_with(a), (Some(2), Some(1)));
        assert_eq!(Triangle::new(5, 6, 7).shared_vertices_with(a), (None, None));
        assert_eq!(Triangle::new(5, 1, 7).shared_vertices_with(a), (Some(1), None));
    }

    #[test]
    fn winding_follows_stored_cycle() {
        let t = Triangle::new(0, 1, 2);
        assert!(t.is_cw(0, 1));
        assert!(t.is_cw(1, 2));
        assert!(t.is_cw(2, 0));
        assert!(!t.is_cw(1, 0));
        assert!(!t.is_cw(2, 1));
        assert!(!t.is_cw(0, 2));
    }

    #[test]
    fn fresh_face_is_unclaimed() {
        let f = FaceInfo::new(3, 4, 5);
        assert_eq!(f.strip_id, -1);
        assert_eq!(f.test_strip_id, -1);
        assert_eq!(f.experiment_id, -1);
    }
}
