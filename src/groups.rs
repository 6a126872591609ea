//! Output primitive groups and the index-remapping utility.

use crate::strip_error::MeshStripError;

/// How a group's indices are to be interpreted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// Consecutive index triples are independent triangles.
    List,
    /// Overlapping triples form triangles with alternating winding.
    Strip,
}

/// One renderable batch: a triangle strip or a triangle list.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveGroup {
    pub kind: PrimitiveKind,
    pub indices: Vec<u32>,
}

impl PrimitiveGroup {
    /// Expand the group into individual triangles with their original
    /// winding. For strips, the standard alternating rule applies and
    /// degenerate triples (the stitching taps) are skipped.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match self.kind {
            PrimitiveKind::List => self
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            PrimitiveKind::Strip => {
                let mut out = Vec::new();
                if self.indices.len() < 3 {
                    return out;
                }
                for i in 0..self.indices.len() - 2 {
                    let (a, b, c) = (self.indices[i], self.indices[i + 1], self.indices[i + 2]);
                    if a == b || a == c || b == c {
                        continue;
                    }
                    out.push(if i % 2 == 0 { [a, b, c] } else { [b, a, c] });
                }
                out
            }
        }
    }
}

/// Renumber the indices of `groups` in first-touch order: the first distinct
/// index encountered becomes 0, the next 1, and so on across all groups.
/// Callers are expected to permute their vertex buffer to match.
///
/// `num_verts` bounds the caller's index space; any index at or above it is
/// reported as an error.
pub fn remap_indices(
    groups: &[PrimitiveGroup],
    num_verts: usize,
) -> Result<Vec<PrimitiveGroup>, MeshStripError> {
    let mut index_cache: Vec<Option<u32>> = vec![None; num_verts];
    let mut next_index: u32 = 0;

    let mut remapped = Vec::with_capacity(groups.len());
    for group in groups {
        let mut indices = Vec::with_capacity(group.indices.len());
        for &old in &group.indices {
            let slot = index_cache
                .get_mut(old as usize)
                .ok_or(MeshStripError::IndexOutOfRange {
                    index: old,
                    num_verts,
                })?;
            let new = match *slot {
                Some(seen) => seen,
                None => {
                    let fresh = next_index;
                    *slot = Some(fresh);
                    next_index += 1;
                    fresh
                }
            };
            indices.push(new);
        }
        remapped.push(PrimitiveGroup {
            kind: group.kind,
            indices,
        });
    }
    Ok(remapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_expansion_skips_taps_and_alternates_winding() {
        let group = PrimitiveGroup {
            kind: PrimitiveKind::Strip,
            indices: vec![0, 1, 2, 2, 3, 3, 4, 5],
        };
        // The bridge taps 2,2 / 3,3 only produce degenerate triples, and the
        // surviving second triangle reads reversed-first-pair at odd parity.
        assert_eq!(group.triangles(), vec![[0, 1, 2], [4, 3, 5]]);
    }

    #[test]
    fn remap_is_first_touch_order() {
        let groups = [PrimitiveGroup {
            kind: PrimitiveKind::Strip,
            indices: vec![5, 9, 5, 2],
        }];
        let out = remap_indices(&groups, 10).unwrap();
        assert_eq!(out[0].indices, vec![0, 1, 0, 2]);
    }

    #[test]
    fn remap_spans_groups() {
        let groups = [
            PrimitiveGroup {
                kind: PrimitiveKind::Strip,
                indices: vec![7, 3],
            },
            PrimitiveGroup {
                kind: PrimitiveKind::List,
                indices: vec![3, 8],
            },
        ];
        let out = remap_indices(&groups, 9).unwrap();
        assert_eq!(out[0].indices, vec![0, 1]);
        assert_eq!(out[1].indices, vec![1, 2]);
    }

    #[test]
    fn remap_rejects_out_of_range_indices() {
        let groups = [PrimitiveGroup {
            kind: PrimitiveKind::List,
            indices: vec![0, 1, 4],
        }];
        assert_eq!(
            remap_indices(&groups, 4).unwrap_err(),
            MeshStripError::IndexOutOfRange {
                index: 4,
                num_verts: 4
            }
        );
    }
}
