//! The stripifier facade: options, the pipeline, and group packaging.

use crate::algs::emit::{create_strips, StripIndex};
use crate::algs::experiments::{find_all_strips, NUM_SAMPLES};
use crate::algs::optimize::split_and_optimize;
use crate::groups::{PrimitiveGroup, PrimitiveKind};
use crate::strip_error::MeshStripError;
use crate::topology::TopologyIndex;

/// Post-transform cache depth of GeForce1/2-class hardware; the default.
pub const CACHESIZE_GEFORCE1_2: usize = 16;
/// Post-transform cache depth of GeForce3-class hardware.
pub const CACHESIZE_GEFORCE3: usize = 24;

/// Fixed headroom subtracted from the declared cache size before simulation,
/// reflecting empirical eviction behavior of real hardware.
const CACHE_INEFFICIENCY: usize = 6;

/// Caller-visible knobs for one stripification run. The flags are
/// independent of each other.
#[derive(Debug, Clone, Copy)]
pub struct StripifyOptions {
    /// Actual target cache depth (e.g. 16 for GeForce1/2, 24 for GeForce3);
    /// controls the length of the generated pieces.
    pub cache_size: usize,
    /// Join all strips into one using degenerate bridges. Off, every strip
    /// becomes its own group.
    pub stitch_strips: bool,
    /// Strips shorter than this many triangles are emitted in the leftover
    /// list group instead.
    pub min_strip_size: usize,
    /// Skip strips entirely and return one cache-optimized triangle list.
    pub lists_only: bool,
}

impl Default for StripifyOptions {
    fn default() -> Self {
        StripifyOptions {
            cache_size: CACHESIZE_GEFORCE1_2,
            stitch_strips: true,
            min_strip_size: 0,
            lists_only: false,
        }
    }
}

/// Stripify `indices` (three entries per triangle) into primitive groups.
///
/// With `lists_only` the result is a single LIST group. Otherwise it is one
/// stitched STRIP group (or one group per strip when `stitch_strips` is
/// off), followed by a LIST group holding the leftover triangles, if any.
/// Empty input produces no groups.
///
/// # Errors
/// [`MeshStripError::IndexCountNotTriangular`] when the index count is not a
/// multiple of three.
pub fn generate_strips(
    indices: &[u32],
    options: &StripifyOptions,
) -> Result<Vec<PrimitiveGroup>, MeshStripError> {
    if indices.len() % 3 != 0 {
        return Err(MeshStripError::IndexCountNotTriangular(indices.len()));
    }
    if indices.is_empty() {
        return Ok(Vec::new());
    }

    let max_index = indices.iter().copied().max().unwrap_or(0) as usize;
    let cache_size = 1.max(options.cache_size.saturating_sub(CACHE_INEFFICIENCY));

    let mut topo = TopologyIndex::build(indices, max_index);
    let all_strips = find_all_strips(&mut topo, NUM_SAMPLES);
    let (strips, leftover) =
        split_and_optimize(&topo, all_strips, cache_size, options.min_strip_size);

    let mut groups = Vec::new();
    if options.lists_only {
        // Flatten everything into one list; bridge fillers are useless in a
        // list and disappear here.
        let mut list = Vec::new();
        for strip in &strips {
            for face in &strip.faces {
                let tri = face.tri(&topo);
                if !tri.is_degenerate() {
                    list.extend([tri.v0, tri.v1, tri.v2]);
                }
            }
        }
        for tri in &leftover {
            list.extend([tri.v0, tri.v1, tri.v2]);
        }
        groups.push(PrimitiveGroup {
            kind: PrimitiveKind::List,
            indices: list,
        });
    } else {
        if !strips.is_empty() {
            let (stream, num_separate) = create_strips(&strips, &topo, options.stitch_strips);
            if options.stitch_strips {
                debug_assert_eq!(num_separate, 1);
                groups.push(PrimitiveGroup {
                    kind: PrimitiveKind::Strip,
                    indices: stream
                        .into_iter()
                        .map(|s| match s {
                            StripIndex::Vertex(v) => v,
                            StripIndex::Restart => {
                                unreachable!("stitched streams carry no restarts")
                            }
                        })
                        .collect(),
                });
            } else {
                let mut current = Vec::new();
                for entry in stream {
                    match entry {
                        StripIndex::Vertex(v) => current.push(v),
                        StripIndex::Restart => {
                            groups.push(PrimitiveGroup {
                                kind: PrimitiveKind::Strip,
                                indices: std::mem::take(&mut current),
                            });
                        }
                    }
                }
                debug_assert!(current.is_empty(), "stream must end on a restart");
                debug_assert_eq!(
                    groups.len(),
                    num_separate,
                    "one group per separate strip"
                );
            }
        }
        if !leftover.is_empty() {
            let mut list = Vec::with_capacity(leftover.len() * 3);
            for tri in &leftover {
                list.extend([tri.v0, tri.v1, tri.v2]);
            }
            groups.push(PrimitiveGroup {
                kind: PrimitiveKind::List,
                indices: list,
            });
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_partial_triangles() {
        assert_eq!(
            generate_strips(&[0, 1], &StripifyOptions::default()).unwrap_err(),
            MeshStripError::IndexCountNotTriangular(2)
        );
    }

    #[test]
    fn empty_input_is_legal() {
        let groups = generate_strips(&[], &StripifyOptions::default()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn all_degenerate_input_collapses_to_an_empty_list_group() {
        let options = StripifyOptions {
            lists_only: true,
            ..Default::default()
        };
        let groups = generate_strips(&[4, 4, 4, 1, 1, 2], &options).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, PrimitiveKind::List);
        assert!(groups[0].indices.is_empty());
    }

    #[test]
    fn tiny_cache_sizes_clamp_to_one() {
        // cache_size below the inefficiency allowance must still work.
        let options = StripifyOptions {
            cache_size: 4,
            ..Default::default()
        };
        let groups = generate_strips(&[0, 1, 2, 2, 1, 3], &options).unwrap();
        assert!(!groups.is_empty());
    }
}
