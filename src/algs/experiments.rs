//! The outer strip-discovery heuristic.
//!
//! Stripification runs in rounds. Each round samples up to [`NUM_SAMPLES`]
//! reset points (unclaimed faces in hopefully-unexplored regions of the
//! mesh) and spawns six speculative experiments per reset point, one per
//! directed edge of the seed face. An experiment grows its seed strip, then
//! keeps chaining follow-up strips found by [`find_traversal`] until the
//! neighborhood is exhausted. The experiment with the longest strips on
//! average wins the round and is committed; every other experiment is
//! dropped wholesale, claims and swap fillers included. Rounds continue
//! until no unclaimed face remains.

use std::collections::HashSet;

use crate::topology::{FaceId, TopologyIndex};

use super::strip::{StripInfo, StripStart};

/// Reset points sampled per round.
pub const NUM_SAMPLES: usize = 10;

/// Seed-hopping state for reset-point selection.
struct ResetState {
    mesh_jump: f32,
    first_time: bool,
}

/// Run the full experiment loop and return the committed strips in commit
/// order. Faces they own are marked permanently in `topo`.
pub fn find_all_strips(topo: &mut TopologyIndex, num_samples: usize) -> Vec<StripInfo> {
    let mut all_strips: Vec<StripInfo> = Vec::new();
    if topo.faces.is_empty() {
        return all_strips;
    }

    let mut state = ResetState {
        mesh_jump: 0.0,
        first_time: true,
    };
    let mut experiment_id: i32 = 0;
    let mut strip_id: i32 = 0;
    let mut done = false;

    while !done {
        // Phase 1: set up the round's experiments, six per fresh reset point.
        let mut experiments: Vec<Vec<StripInfo>> = Vec::new();
        let mut reset_points: HashSet<FaceId> = HashSet::new();
        for _ in 0..num_samples {
            let Some(seed) = find_good_reset_point(topo, &mut state) else {
                done = true;
                break;
            };
            if !reset_points.insert(seed) {
                continue;
            }
            debug_assert!(topo.faces[seed.index()].strip_id < 0);

            let tri = topo.faces[seed.index()].tri();
            let edge01 = topo.face_edge(tri.v0, tri.v1);
            let edge12 = topo.face_edge(tri.v1, tri.v2);
            let edge20 = topo.face_edge(tri.v2, tri.v0);
            for (edge, to_v1) in [
                (edge01, true),
                (edge01, false),
                (edge12, true),
                (edge12, false),
                (edge20, true),
                (edge20, false),
            ] {
                let strip = StripInfo::new(
                    StripStart {
                        face: seed,
                        edge,
                        to_v1,
                    },
                    strip_id,
                    experiment_id,
                );
                strip_id += 1;
                experiment_id += 1;
                experiments.push(vec![strip]);
            }
        }

        // Phase 2: actually build each experiment's strip chain.
        for experiment in &mut experiments {
            experiment[0].build(topo);
            let chain_experiment_id = experiment[0].experiment_id;
            loop {
                let Some(start) = find_traversal(topo, experiment.last().expect("seeded")) else {
                    break;
                };
                let mut strip = StripInfo::new(start, strip_id, chain_experiment_id);
                strip_id += 1;
                strip.build(topo);
                experiment.push(strip);
            }
        }

        // Phase 3: score by average strip size; the first maximum wins.
        let mut best_index = 0;
        let mut best_value = 0.0f32;
        for (i, experiment) in experiments.iter().enumerate() {
            let value = avg_strip_size(experiment);
            if value > best_value {
                best_value = value;
                best_index = i;
            }
        }

        // Phase 4: commit the winner; the losers (and their swap fillers)
        // are dropped here, leaving the shared faces untouched.
        if !experiments.is_empty() {
            let winner = experiments.swap_remove(best_index);
            commit_strips(&mut all_strips, winner, topo);
        }
    }

    all_strips
}

/// Average real-face count per strip of one experiment (swap fillers do not
/// count toward length).
fn avg_strip_size(strips: &[StripInfo]) -> f32 {
    let mut accum: isize = 0;
    for strip in strips {
        accum += strip.faces.len() as isize - strip.num_degenerates as isize;
    }
    accum as f32 / strips.len() as f32
}

/// Make the winning experiment's claims permanent and append its strips to
/// the committed list.
fn commit_strips(all_strips: &mut Vec<StripInfo>, strips: Vec<StripInfo>, topo: &mut TopologyIndex) {
    for mut strip in strips {
        strip.experiment_id = -1;
        for i in 0..strip.faces.len() {
            if let Some(face) = strip.faces[i].as_real() {
                strip.mark_triangle(topo, face);
            }
        }
        all_strips.push(strip);
    }
}

/// Pick the next reset point: the first round prefers a mesh-boundary face,
/// later rounds hop pseudo-randomly through the face table, and a linear
/// probe (with wrap) lands on the nearest unclaimed face. `None` once every
/// face is claimed.
fn find_good_reset_point(topo: &TopologyIndex, state: &mut ResetState) -> Option<FaceId> {
    let num_faces = topo.faces.len();

    let seeded = if state.first_time {
        state.first_time = false;
        find_start_point(topo)
    } else {
        None
    };
    // The jump index stays in range even when accumulated float error pushes
    // mesh_jump a hair past 1.
    let start = seeded
        .unwrap_or_else(|| ((num_faces - 1) as f32 * state.mesh_jump) as usize)
        .min(num_faces - 1);

    let mut result = None;
    let mut i = start;
    loop {
        if topo.faces[i].strip_id < 0 {
            result = Some(FaceId::new(i));
            break;
        }
        i += 1;
        if i >= num_faces {
            i = 0;
        }
        if i == start {
            break;
        }
    }

    state.mesh_jump += 0.1;
    if state.mesh_jump > 1.0 {
        state.mesh_jump = 0.05;
    }

    result
}

/// The face with the most boundary edges, ties to the lowest index; `None`
/// when every face has full adjacency.
fn find_start_point(topo: &TopologyIndex) -> Option<usize> {
    let mut best_ctr: i32 = -1;
    let mut best_index = None;
    for (i, face) in topo.faces.iter().enumerate() {
        let boundary_edges = 3 - topo.num_neighbors(face.tri(), Some(FaceId::new(i))) as i32;
        if boundary_edges > best_ctr {
            best_ctr = boundary_edges;
            best_index = Some(i);
        }
    }
    if best_ctr == 0 { None } else { best_index }
}

/// From the exit vertex of a just-built strip, find an adjacent unclaimed
/// face to seed the next strip of the chain, oriented so the new strip's
/// first directed edge leaves the exit vertex.
pub fn find_traversal(topo: &TopologyIndex, strip: &StripInfo) -> Option<StripStart> {
    let start = strip.start?;
    let seed_edge = &topo.edges[start.edge.index()];
    let v = if start.to_v1 { seed_edge.v1 } else { seed_edge.v0 };

    let mut found = None;
    let mut iter = topo.chain_head(v);
    while let Some(id) = iter {
        let edge = &topo.edges[id.index()];
        let (face0, face1) = (edge.face0, edge.face1);
        if face0.is_some()
            && !strip.is_in_strip(topo, face0)
            && face1.is_some_and(|f| !strip.is_marked(topo, f))
        {
            found = Some((face1.expect("checked"), id));
            break;
        }
        if face1.is_some()
            && !strip.is_in_strip(topo, face1)
            && face0.is_some_and(|f| !strip.is_marked(topo, f))
        {
            found = Some((face0.expect("checked"), id));
            break;
        }
        iter = edge.next_for(v);
    }

    let (face, edge_id) = found?;
    let edge = &topo.edges[edge_id.index()];
    let to_v1 = if strip.shares_edge(topo, face) {
        edge.v0 == v
    } else {
        edge.v1 == v
    };
    Some(StripStart {
        face,
        edge: edge_id,
        to_v1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_face_wins_the_first_seed() {
        // The end faces of the fence have two boundary edges, the interior
        // ones only one; the tie between the two ends goes to the lower
        // index.
        let indices = [0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5];
        let topo = TopologyIndex::build(&indices, 5);
        assert_eq!(find_start_point(&topo), Some(0));
    }

    #[test]
    fn fully_interior_mesh_has_no_start_point() {
        // A tetrahedron: every edge has two faces, no boundary anywhere.
        let indices = [0, 1, 2, 0, 3, 1, 1, 3, 2, 2, 3, 0];
        let topo = TopologyIndex::build(&indices, 3);
        assert_eq!(find_start_point(&topo), None);
    }

    #[test]
    fn reset_point_probes_past_claimed_faces() {
        let mut topo = TopologyIndex::build(&[0, 1, 2, 3, 4, 5, 6, 7, 8], 8);
        topo.faces[0].strip_id = 0;
        let mut state = ResetState {
            mesh_jump: 0.0,
            first_time: false,
        };
        // Jump lands on face 0 (claimed); the probe walks to face 1.
        assert_eq!(
            find_good_reset_point(&topo, &mut state),
            Some(FaceId::new(1))
        );
        assert!((state.mesh_jump - 0.1).abs() < 1e-6);
    }

    #[test]
    fn reset_point_exhausted_when_all_claimed() {
        let mut topo = TopologyIndex::build(&[0, 1, 2, 3, 4, 5], 5);
        topo.faces[0].strip_id = 0;
        topo.faces[1].strip_id = 1;
        let mut state = ResetState {
            mesh_jump: 0.5,
            first_time: false,
        };
        assert_eq!(find_good_reset_point(&topo, &mut state), None);
    }

    #[test]
    fn mesh_jump_wraps_above_one() {
        let topo = TopologyIndex::build(&[0, 1, 2], 2);
        let mut state = ResetState {
            mesh_jump: 1.05,
            first_time: false,
        };
        find_good_reset_point(&topo, &mut state);
        assert!((state.mesh_jump - 0.05).abs() < 1e-6);
    }

    #[test]
    fn every_face_is_claimed_after_the_search() {
        let indices = [0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5, 3, 5, 6, 5, 6, 7];
        let mut topo = TopologyIndex::build(&indices, 7);
        let strips = find_all_strips(&mut topo, NUM_SAMPLES);
        assert!(!strips.is_empty());
        for face in &topo.faces {
            assert!(face.strip_id >= 0, "face left unclaimed");
        }
        for strip in &strips {
            assert_eq!(strip.experiment_id, -1);
            assert!(!strip.faces.is_empty());
        }
        // Committed real faces cover the face table exactly once.
        let mut covered: Vec<usize> = strips
            .iter()
            .flat_map(|s| s.faces.iter().filter_map(|f| f.as_real().map(FaceId::index)))
            .collect();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered.len(), topo.faces.len());
    }

    #[test]
    fn empty_face_table_yields_no_strips() {
        let mut topo = TopologyIndex::build(&[], 0);
        assert!(find_all_strips(&mut topo, NUM_SAMPLES).is_empty());
    }

    #[test]
    fn traversal_finds_a_free_pair_at_the_exit_vertex() {
        // A strip over face 0 exits at vertex 2; edge (4, 2) carries two
        // free faces there and seeds the next strip. The chains are
        // newest-first, so that pair is found before the strip's own edges.
        let indices = [0, 1, 2, 2, 3, 4, 2, 4, 5];
        let mut topo = TopologyIndex::build(&indices, 5);
        let edge = topo.find_edge(1, 2).unwrap();
        let mut strip = StripInfo::new(
            StripStart {
                face: FaceId::new(0),
                edge,
                to_v1: true,
            },
            0,
            0,
        );
        strip.build(&mut topo);
        assert_eq!(strip.faces.len(), 1);

        let start = find_traversal(&topo, &strip).expect("free pair reachable");
        assert_eq!(start.face, FaceId::new(2));
        assert_eq!(start.edge, topo.find_edge(4, 2).unwrap());
        // The found face is not adjacent to the strip, so the direction runs
        // toward the exit vertex rather than away from it.
        assert!(start.to_v1);
    }

    #[test]
    fn traversal_has_nowhere_to_go_on_a_lone_triangle() {
        let mut topo = TopologyIndex::build(&[0, 1, 2], 2);
        let edge = topo.find_edge(0, 1).unwrap();
        let mut strip = StripInfo::new(
            StripStart {
                face: FaceId::new(0),
                edge,
                to_v1: true,
            },
            0,
            0,
        );
        strip.build(&mut topo);
        assert!(find_traversal(&topo, &strip).is_none());
    }
}
