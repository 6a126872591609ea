//! Provisional strips and the forward/backward growth pass.
//!
//! A [`StripInfo`] starts from a seed face and one of its directed edges,
//! walks the topology forward across shared edges as far as it can, then
//! walks backward from the seed, and finally records the backward faces
//! (reversed) followed by the forward faces. While walking it claims every
//! face it takes: provisionally, scoped to its experiment, or permanently
//! once the experiment is committed.
//!
//! When the walk would dead-end one step ahead but a neighbor across the
//! other tail edge is free, a synthesized degenerate "swap" filler is spliced
//! in so the strip can turn. Fillers are owned by the strip that created
//! them; they never enter the topology arena and vanish with the strip when
//! an experiment loses.

use crate::topology::{EdgeId, FaceId, TopologyIndex, Triangle};

/// Parameters that start a strip: the seed face, the seed edge, and whether
/// traversal of that edge runs v0 -> v1.
#[derive(Copy, Clone, Debug)]
pub struct StripStart {
    pub face: FaceId,
    pub edge: EdgeId,
    pub to_v1: bool,
}

/// One entry in a strip's face list.
#[derive(Copy, Clone, Debug)]
pub enum StripFace {
    /// A real mesh face in the topology arena.
    Real(FaceId),
    /// A synthesized degenerate filler, owned by this strip.
    Swap(Triangle),
}

impl StripFace {
    /// The vertex triple, resolving arena handles through `topo`.
    #[inline]
    pub fn tri(&self, topo: &TopologyIndex) -> Triangle {
        match *self {
            StripFace::Real(id) => topo.faces[id.index()].tri(),
            StripFace::Swap(tri) => tri,
        }
    }

    /// The arena identity, if this is a real face.
    #[inline]
    pub fn as_real(&self) -> Option<FaceId> {
        match *self {
            StripFace::Real(id) => Some(id),
            StripFace::Swap(_) => None,
        }
    }
}

/// A strip under construction or committed, plus the scheduling state the
/// split/reorder pass uses.
#[derive(Debug, Clone)]
pub struct StripInfo {
    pub start: Option<StripStart>,
    pub faces: Vec<StripFace>,
    pub strip_id: i32,
    /// Owning experiment; -1 once committed.
    pub experiment_id: i32,
    /// Scratch flag for the cache-aware reorderer.
    pub visited: bool,
    /// How many swap fillers this strip synthesized.
    pub num_degenerates: usize,
}

impl StripInfo {
    pub fn new(start: StripStart, strip_id: i32, experiment_id: i32) -> Self {
        StripInfo {
            start: Some(start),
            faces: Vec::new(),
            strip_id,
            experiment_id,
            visited: false,
            num_degenerates: 0,
        }
    }

    /// A bare piece produced by the splitter; it has no seed of its own.
    pub(crate) fn piece() -> Self {
        StripInfo {
            start: None,
            faces: Vec::new(),
            strip_id: 0,
            experiment_id: -1,
            visited: false,
            num_degenerates: 0,
        }
    }

    #[inline]
    pub fn is_experiment(&self) -> bool {
        self.experiment_id >= 0
    }

    /// Whether `face` belongs to this strip, under the claim scope that is
    /// currently live (provisional while experimenting, permanent after).
    pub fn is_in_strip(&self, topo: &TopologyIndex, face: Option<FaceId>) -> bool {
        let Some(face) = face else { return false };
        let info = &topo.faces[face.index()];
        if self.is_experiment() {
            info.test_strip_id == self.strip_id
        } else {
            info.strip_id == self.strip_id
        }
    }

    /// A face is unavailable if a committed strip owns it, or this strip's
    /// own experiment already claimed it.
    pub fn is_marked(&self, topo: &TopologyIndex, face: FaceId) -> bool {
        let info = &topo.faces[face.index()];
        info.strip_id >= 0 || (self.is_experiment() && info.experiment_id == self.experiment_id)
    }

    /// Claim `face` for this strip.
    pub fn mark_triangle(&self, topo: &mut TopologyIndex, face: FaceId) {
        debug_assert!(!self.is_marked(topo, face));
        let info = &mut topo.faces[face.index()];
        if self.is_experiment() {
            info.experiment_id = self.experiment_id;
            info.test_strip_id = self.strip_id;
        } else {
            debug_assert_eq!(info.strip_id, -1);
            info.experiment_id = -1;
            info.strip_id = self.strip_id;
        }
    }

    /// True if `face` shares an edge with a face already in this strip.
    pub fn shares_edge(&self, topo: &TopologyIndex, face: FaceId) -> bool {
        let tri = topo.faces[face.index()].tri();
        for (a, b) in tri.edges() {
            if let Some(id) = topo.find_edge(a, b) {
                let edge = &topo.edges[id.index()];
                if self.is_in_strip(topo, edge.face0) || self.is_in_strip(topo, edge.face1) {
                    return true;
                }
            }
        }
        false
    }

    /// Grow the strip from its seed: forward as far as possible, then
    /// backward, then combine (backward reversed, then forward).
    pub fn build(&mut self, topo: &mut TopologyIndex) {
        let start = self.start.expect("build needs a seeded strip");

        let mut scratch: Vec<u32> = Vec::new();
        let mut forward: Vec<StripFace> = Vec::new();
        let mut backward: Vec<StripFace> = Vec::new();

        forward.push(StripFace::Real(start.face));
        self.mark_triangle(topo, start.face);

        let seed_edge = &topo.edges[start.edge.index()];
        let v0 = if start.to_v1 { seed_edge.v0 } else { seed_edge.v1 };
        let v1 = if start.to_v1 { seed_edge.v1 } else { seed_edge.v0 };

        // v2 is the seed face's vertex off the seed edge; next_index finds it
        // from the rolling tail.
        scratch.push(v0);
        scratch.push(v1);
        let v2 = next_index(&scratch, topo.faces[start.face.index()].tri());
        scratch.push(v2);

        // Forward walk.
        let mut nv0 = v1;
        let mut nv1 = v2;
        let mut next_face = topo.other_face(nv0, nv1, Some(start.face));
        while let Some(face) = next_face {
            if self.is_marked(topo, face) {
                break;
            }

            // Probe one face ahead; if that is blocked, try turning instead.
            let mut testnv0 = nv1;
            let testnv1 = next_index(&scratch, topo.faces[face.index()].tri());
            let probe = topo.other_face(testnv0, testnv1, Some(face));
            if probe.is_none() || probe.is_some_and(|f| self.is_marked(topo, f)) {
                let turn = topo.other_face(nv0, testnv1, Some(face));
                if turn.is_some_and(|f| !self.is_marked(topo, f)) {
                    // The swap buys us a continuation: splice in a filler and
                    // roll the tail off the pre-swap edge.
                    forward.push(StripFace::Swap(Triangle::new(nv0, nv1, nv0)));
                    scratch.push(nv0);
                    testnv0 = nv0;
                    self.num_degenerates += 1;
                }
            }

            forward.push(StripFace::Real(face));
            self.mark_triangle(topo, face);
            scratch.push(testnv1);

            nv0 = testnv0;
            nv1 = testnv1;
            next_face = topo.other_face(nv0, nv1, Some(face));
        }

        // Everything taken so far, for the wrap-around guard below.
        let mut taken: Vec<StripFace> = forward.clone();

        // Backward walk: re-seed the tail in the opposite direction.
        scratch.clear();
        scratch.extend([v2, v1, v0]);
        nv0 = v1;
        nv1 = v0;
        next_face = topo.other_face(nv0, nv1, Some(start.face));
        while let Some(face) = next_face {
            if self.is_marked(topo, face) {
                break;
            }
            // Reject faces whose whole vertex set is already in the strip;
            // accepting one would wrap the strip onto itself.
            if !is_unique(topo, &taken, topo.faces[face.index()].tri()) {
                break;
            }

            let mut testnv0 = nv1;
            let testnv1 = next_index(&scratch, topo.faces[face.index()].tri());
            let probe = topo.other_face(testnv0, testnv1, Some(face));
            if probe.is_none() || probe.is_some_and(|f| self.is_marked(topo, f)) {
                let turn = topo.other_face(nv0, testnv1, Some(face));
                if turn.is_some_and(|f| !self.is_marked(topo, f)) {
                    backward.push(StripFace::Swap(Triangle::new(nv0, nv1, nv0)));
                    scratch.push(nv0);
                    testnv0 = nv0;
                    self.num_degenerates += 1;
                }
            }

            backward.push(StripFace::Real(face));
            taken.push(StripFace::Real(face));
            self.mark_triangle(topo, face);
            scratch.push(testnv1);

            nv0 = testnv0;
            nv1 = testnv1;
            next_face = topo.other_face(nv0, nv1, Some(face));
        }

        self.faces.extend(backward.iter().rev().copied());
        self.faces.extend(forward);
    }
}

/// The vertex of `tri` off the strip's current tail edge (the last two
/// scratch indices).
///
/// A well-formed neighbor always has exactly one such vertex. A face missing
/// a tail vertex means the topology got derailed (typically by duplicate
/// triangles); the walk logs it and continues with the least-bad choice.
fn next_index(scratch: &[u32], tri: Triangle) -> u32 {
    debug_assert!(scratch.len() >= 2);
    let v0 = scratch[scratch.len() - 2];
    let v1 = scratch[scratch.len() - 1];

    let on_tail = |v: u32| v == v0 || v == v1;

    if !on_tail(tri.v0) {
        if !on_tail(tri.v1) || !on_tail(tri.v2) {
            log::warn!(
                "next-index lookup: triangle ({}, {}, {}) is missing a tail vertex of \
                 ({v0}, {v1}); a duplicate triangle probably derailed the walk",
                tri.v0,
                tri.v1,
                tri.v2
            );
        }
        return tri.v0;
    }
    if !on_tail(tri.v1) {
        if !on_tail(tri.v0) || !on_tail(tri.v2) {
            log::warn!(
                "next-index lookup: triangle ({}, {}, {}) is missing a tail vertex of \
                 ({v0}, {v1}); a duplicate triangle probably derailed the walk",
                tri.v0,
                tri.v1,
                tri.v2
            );
        }
        return tri.v1;
    }
    if !on_tail(tri.v2) {
        if !on_tail(tri.v0) || !on_tail(tri.v1) {
            log::warn!(
                "next-index lookup: triangle ({}, {}, {}) is missing a tail vertex of \
                 ({v0}, {v1}); a duplicate triangle probably derailed the walk",
                tri.v0,
                tri.v1,
                tri.v2
            );
        }
        return tri.v2;
    }

    // All three vertices sit on the two tail values, so the triangle repeats
    // one of them; return a repeated vertex.
    if tri.v0 == tri.v1 || tri.v0 == tri.v2 {
        tri.v0
    } else {
        tri.v1
    }
}

/// True if `candidate` has at least one vertex not appearing anywhere in
/// `taken`.
fn is_unique(topo: &TopologyIndex, taken: &[StripFace], candidate: Triangle) -> bool {
    let mut seen0 = false;
    let mut seen1 = false;
    let mut seen2 = false;
    for face in taken {
        let tri = face.tri(topo);
        seen0 = seen0 || tri.contains(candidate.v0);
        seen1 = seen1 || tri.contains(candidate.v1);
        seen2 = seen2 || tri.contains(candidate.v2);
        if seen0 && seen1 && seen2 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_strip(topo: &TopologyIndex, face: usize, a: u32, b: u32, to_v1: bool) -> StripInfo {
        let edge = topo.find_edge(a, b).expect("seed edge");
        StripInfo::new(
            StripStart {
                face: FaceId::new(face),
                edge,
                to_v1,
            },
            0,
            0,
        )
    }

    fn tris(strip: &StripInfo, topo: &TopologyIndex) -> Vec<(u32, u32, u32)> {
        strip
            .faces
            .iter()
            .map(|f| {
                let t = f.tri(topo);
                (t.v0, t.v1, t.v2)
            })
            .collect()
    }

    #[test]
    fn forward_walk_follows_a_fence() {
        // Four triangles in a row: 0-1-2, 2-1-3, 2-3-4, 4-3-5.
        let mut topo = TopologyIndex::build(&[0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5], 5);
        let mut strip = seeded_strip(&topo, 0, 0, 1, true);
        strip.build(&mut topo);
        assert_eq!(
            tris(&strip, &topo),
            vec![(0, 1, 2), (2, 1, 3), (2, 3, 4), (4, 3, 5)]
        );
        assert_eq!(strip.num_degenerates, 0);
        for face in &topo.faces {
            assert_eq!(face.experiment_id, 0);
            assert_eq!(face.test_strip_id, 0);
            assert_eq!(face.strip_id, -1);
        }
    }

    #[test]
    fn backward_faces_come_first_reversed() {
        // Seed in the middle of the fence; the walk goes both ways.
        let mut topo = TopologyIndex::build(&[0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5], 5);
        let mut strip = seeded_strip(&topo, 1, 1, 2, true);
        strip.build(&mut topo);
        // All four faces end up in one strip, seed included.
        assert_eq!(strip.faces.len(), 4);
        let mut ids: Vec<usize> = strip
            .faces
            .iter()
            .filter_map(|f| f.as_real().map(FaceId::index))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn committed_faces_block_the_walk() {
        let mut topo = TopologyIndex::build(&[0, 1, 2, 2, 1, 3], 3);
        topo.faces[1].strip_id = 7; // already owned by a committed strip
        let mut strip = seeded_strip(&topo, 0, 0, 1, true);
        strip.build(&mut topo);
        assert_eq!(tris(&strip, &topo), vec![(0, 1, 2)]);
    }

    #[test]
    fn swap_filler_is_strip_owned_and_degenerate() {
        // A fan around vertex 2 forces a turn partway along the walk for
        // some seed directions; verify any synthesized filler is degenerate
        // and counted.
        let indices = [0, 1, 2, 2, 1, 3, 2, 3, 4, 2, 4, 5, 2, 5, 0];
        let mut topo = TopologyIndex::build(&indices, 5);
        let mut strip = seeded_strip(&topo, 0, 0, 1, true);
        strip.build(&mut topo);
        let fillers = strip
            .faces
            .iter()
            .filter(|f| f.as_real().is_none())
            .count();
        assert_eq!(fillers, strip.num_degenerates);
        for face in &strip.faces {
            if face.as_real().is_none() {
                assert!(face.tri(&topo).is_degenerate());
            }
        }
        // Real faces of the strip each appear exactly once.
        let mut ids: Vec<usize> = strip
            .faces
            .iter()
            .filter_map(|f| f.as_real().map(FaceId::index))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(
            ids.len(),
            strip.faces.len() - strip.num_degenerates,
            "no real face may be taken twice"
        );
    }

    #[test]
    fn next_index_picks_the_off_tail_vertex() {
        assert_eq!(next_index(&[0, 1], Triangle::new(0, 1, 2)), 2);
        assert_eq!(next_index(&[1, 2], Triangle::new(2, 1, 3)), 3);
        assert_eq!(next_index(&[5, 9, 1, 2], Triangle::new(2, 1, 3)), 3);
    }

    #[test]
    fn uniqueness_guard_spots_wrapping() {
        let topo = TopologyIndex::build(&[0, 1, 2], 2);
        let taken = vec![StripFace::Real(FaceId::new(0))];
        assert!(!is_unique(&topo, &taken, Triangle::new(2, 1, 0)));
        assert!(is_unique(&topo, &taken, Triangle::new(2, 1, 9)));
        assert!(is_unique(&topo, &[], Triangle::new(0, 1, 2)));
    }
}
