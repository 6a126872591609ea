//! Splitting committed strips into cache-sized pieces and reordering them
//! for cache reuse.
//!
//! Splitting cuts each committed strip into consecutive pieces of exactly
//! `cache_size` real faces (fillers ride along, except at piece boundaries
//! where they are dropped), merging a 1–3-face tail into the previous piece
//! rather than emitting a tiny fragment. Pieces shorter than the configured
//! minimum spill their faces into the leftover list, which is itself
//! reordered greedily by per-face cache hits. The surviving pieces are then
//! scheduled: the most isolated piece goes first, and each subsequent pick
//! maximizes simulated cache hits per face, with ties broken toward the
//! piece whose first triangle already has the winding polarity the emitted
//! sequence wants next.

use crate::topology::{TopologyIndex, Triangle};

use super::emit::canonical_first_triangle;
use super::strip::StripInfo;
use super::vertex_cache::VertexCache;

/// Split the committed strips into cache-sized pieces, spill sub-minimum
/// pieces into the leftover list, and reorder the rest for the vertex cache.
/// Returns the scheduled pieces and the cache-ordered leftover triangles.
pub fn split_and_optimize(
    topo: &TopologyIndex,
    all_strips: Vec<StripInfo>,
    cache_size: usize,
    min_strip_size: usize,
) -> (Vec<StripInfo>, Vec<Triangle>) {
    let pieces = split_strips(topo, &all_strips, cache_size);
    let (survivors, leftover) = remove_small_strips(topo, pieces, min_strip_size, cache_size);
    (reorder_for_cache(topo, survivors, cache_size), leftover)
}

/// Cut strips whose real-face count exceeds `threshold` into
/// `threshold`-sized pieces plus a tail.
fn split_strips(
    topo: &TopologyIndex,
    all_strips: &[StripInfo],
    threshold: usize,
) -> Vec<StripInfo> {
    let mut pieces: Vec<StripInfo> = Vec::new();

    for strip in all_strips {
        let faces = &strip.faces;
        let real_count = faces
            .iter()
            .filter(|f| !f.tri(topo).is_degenerate())
            .count();

        if real_count > threshold {
            let num_times = real_count / threshold;
            let mut num_leftover = real_count % threshold;

            // The running filler count shifts every subsequent piece's
            // window, so it participates in the loop bounds below.
            let mut degenerate_count = 0usize;
            for j in 0..num_times {
                let mut current = StripInfo::piece();
                let mut face_ctr = j * threshold + degenerate_count;
                let mut first_time = true;
                while face_ctr < threshold + j * threshold + degenerate_count {
                    if faces[face_ctr].tri(topo).is_degenerate() {
                        degenerate_count += 1;
                        // A filler is kept only in the middle of a piece; at
                        // the front, or right before a tail small enough to
                        // be merged, it is dropped.
                        if (face_ctr + 1 != threshold + j * threshold + degenerate_count
                            || (j == num_times - 1 && num_leftover < 4 && num_leftover > 0))
                            && !first_time
                        {
                            current.faces.push(faces[face_ctr]);
                        }
                        face_ctr += 1;
                    } else {
                        current.faces.push(faces[face_ctr]);
                        face_ctr += 1;
                        first_time = false;
                    }
                }
                if j == num_times - 1 && num_leftover < 4 && num_leftover > 0 {
                    // The tail is too small to stand alone; append it here.
                    let mut ctr = 0;
                    while ctr < num_leftover {
                        if !faces[face_ctr].tri(topo).is_degenerate() {
                            ctr += 1;
                        } else {
                            degenerate_count += 1;
                        }
                        current.faces.push(faces[face_ctr]);
                        face_ctr += 1;
                    }
                    num_leftover = 0;
                }
                pieces.push(current);
            }

            let mut left_off = num_times * threshold + degenerate_count;
            if num_leftover != 0 {
                let mut current = StripInfo::piece();
                let mut ctr = 0;
                let mut first_time = true;
                while ctr < num_leftover {
                    if !faces[left_off].tri(topo).is_degenerate() {
                        ctr += 1;
                        first_time = false;
                        current.faces.push(faces[left_off]);
                    } else if !first_time {
                        current.faces.push(faces[left_off]);
                    }
                    left_off += 1;
                }
                pieces.push(current);
            }
        } else {
            let mut current = StripInfo::piece();
            current.faces.extend_from_slice(faces);
            pieces.push(current);
        }
    }

    pieces
}

/// Spill every piece shorter than `min_strip_size` into a leftover list and
/// order that list by greedy per-face cache hits (ties to the lowest index).
fn remove_small_strips(
    topo: &TopologyIndex,
    pieces: Vec<StripInfo>,
    min_strip_size: usize,
    cache_size: usize,
) -> (Vec<StripInfo>, Vec<Triangle>) {
    let mut survivors = Vec::new();
    let mut spilled: Vec<Triangle> = Vec::new();
    for piece in pieces {
        if piece.faces.len() < min_strip_size {
            spilled.extend(piece.faces.iter().map(|f| f.tri(topo)));
        } else {
            survivors.push(piece);
        }
    }

    let mut leftover = Vec::with_capacity(spilled.len());
    if !spilled.is_empty() {
        let mut visited = vec![false; spilled.len()];
        let mut vcache = VertexCache::new(cache_size);
        loop {
            let mut best_hits = -1i32;
            let mut best_index = 0usize;
            for (i, tri) in spilled.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let hits = calc_num_hits_face(&vcache, *tri);
                if hits > best_hits {
                    best_hits = hits;
                    best_index = i;
                }
            }
            if best_hits == -1 {
                break;
            }
            visited[best_index] = true;
            update_cache_face(&mut vcache, spilled[best_index]);
            leftover.push(spilled[best_index]);
        }
    }

    (survivors, leftover)
}

/// Greedy piece scheduling against the cache simulation.
fn reorder_for_cache(
    topo: &TopologyIndex,
    mut pieces: Vec<StripInfo>,
    cache_size: usize,
) -> Vec<StripInfo> {
    if pieces.is_empty() {
        return pieces;
    }

    let mut vcache = VertexCache::new(cache_size);

    // Start with the piece whose faces have the fewest neighbors per face:
    // the most isolated region, hardest to reach later.
    let mut first_index = 0usize;
    let mut min_cost = 10_000.0f32;
    for (j, piece) in pieces.iter().enumerate() {
        let num_neighbors: usize = piece
            .faces
            .iter()
            .map(|f| topo.num_neighbors(f.tri(topo), f.as_real()))
            .sum();
        let cost = num_neighbors as f32 / piece.faces.len() as f32;
        if cost < min_cost {
            min_cost = cost;
            first_index = j;
        }
    }

    update_cache_strip(&mut vcache, &pieces[first_index], topo);
    pieces[first_index].visited = true;
    let mut order = vec![first_index];
    let mut wants_cw = pieces[first_index].faces.len() % 2 == 0;

    loop {
        let mut best_hits = -1.0f32;
        let mut best_index = 0usize;
        for (i, piece) in pieces.iter().enumerate() {
            if piece.visited {
                continue;
            }
            let hits = calc_num_hits_strip(&vcache, piece, topo);
            if hits > best_hits {
                best_hits = hits;
                best_index = i;
            } else if hits >= best_hits {
                // Equal cache value: prefer the piece whose first triangle
                // already matches the wanted winding polarity. (No filler
                // pivot handling here, unlike the emitter's reordering.)
                let first = canonical_first_triangle(&piece.faces, topo, false);
                if wants_cw == piece.faces[0].tri(topo).is_cw(first.v0, first.v1) {
                    best_index = i;
                }
            }
        }
        if best_hits == -1.0 {
            break;
        }

        pieces[best_index].visited = true;
        update_cache_strip(&mut vcache, &pieces[best_index], topo);
        order.push(best_index);
        if pieces[best_index].faces.len() % 2 != 0 {
            wants_cw = !wants_cw;
        }
    }

    let mut slots: Vec<Option<StripInfo>> = pieces.into_iter().map(Some).collect();
    order
        .into_iter()
        .map(|i| slots[i].take().expect("each piece scheduled once"))
        .collect()
}

fn update_cache_strip(vcache: &mut VertexCache, strip: &StripInfo, topo: &TopologyIndex) {
    for face in &strip.faces {
        update_cache_face(vcache, face.tri(topo));
    }
}

fn update_cache_face(vcache: &mut VertexCache, tri: Triangle) {
    for v in [tri.v0, tri.v1, tri.v2] {
        if !vcache.in_cache(v) {
            vcache.add_entry(v);
        }
    }
}

/// Average cache hits per face over the whole piece.
fn calc_num_hits_strip(vcache: &VertexCache, strip: &StripInfo, topo: &TopologyIndex) -> f32 {
    let mut num_hits = 0usize;
    let mut num_faces = 0usize;
    for face in &strip.faces {
        num_hits += calc_num_hits_face(vcache, face.tri(topo)) as usize;
        num_faces += 1;
    }
    if num_faces != 0 {
        num_hits as f32 / num_faces as f32
    } else {
        0.0
    }
}

fn calc_num_hits_face(vcache: &VertexCache, tri: Triangle) -> i32 {
    let mut num_hits = 0;
    for v in [tri.v0, tri.v1, tri.v2] {
        if vcache.in_cache(v) {
            num_hits += 1;
        }
    }
    num_hits
}
