//! Post-transform vertex cache simulation.

/// A fixed-capacity window over recently issued vertex indices, newest at
/// slot 0. The model is deliberately simple: no reordering on hit (callers
/// check [`in_cache`](VertexCache::in_cache) first and skip the insert), and
/// scoring is its only purpose.
#[derive(Debug, Clone)]
pub struct VertexCache {
    entries: Vec<Option<u32>>,
}

impl VertexCache {
    pub fn new(size: usize) -> Self {
        VertexCache {
            entries: vec![None; size],
        }
    }

    /// Linear membership scan.
    pub fn in_cache(&self, entry: u32) -> bool {
        self.entries.iter().any(|&e| e == Some(entry))
    }

    /// Prepend `entry`, shifting everything toward the tail; returns the
    /// evicted occupant of the last slot.
    pub fn add_entry(&mut self, entry: u32) -> Option<u32> {
        let evicted = *self.entries.last()?;
        self.entries.rotate_right(1);
        self.entries[0] = Some(entry);
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_eviction_from_tail() {
        let mut cache = VertexCache::new(3);
        assert_eq!(cache.add_entry(1), None);
        assert_eq!(cache.add_entry(2), None);
        assert_eq!(cache.add_entry(3), None);
        assert!(cache.in_cache(1) && cache.in_cache(2) && cache.in_cache(3));
        // 1 is now the oldest and gets pushed out.
        assert_eq!(cache.add_entry(4), Some(1));
        assert!(!cache.in_cache(1));
        assert!(cache.in_cache(4));
    }

    #[test]
    fn clear_empties_all_slots() {
        let mut cache = VertexCache::new(2);
        cache.add_entry(7);
        cache.clear();
        assert!(!cache.in_cache(7));
        assert_eq!(cache.add_entry(8), None);
    }

    #[test]
    fn capacity_one() {
        let mut cache = VertexCache::new(1);
        assert_eq!(cache.add_entry(5), None);
        assert!(cache.in_cache(5));
        assert_eq!(cache.add_entry(6), Some(5));
        assert!(!cache.in_cache(5));
    }
}
