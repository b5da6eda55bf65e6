//! Position index: which dots occupy each track cell
//!
//! Keeps collision lookups O(1). Every live dot sits in exactly one bucket
//! matching its `pos`; removing a dot from a bucket it is not in means the
//! bookkeeping is corrupt, so that panics.

use super::dot::DotId;
use crate::consts::TRACK_LEN;

#[derive(Debug, Clone)]
pub struct PositionIndex {
    buckets: Vec<Vec<DotId>>,
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionIndex {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); TRACK_LEN],
        }
    }

    /// Dots at `pos` (empty for off-track cells)
    pub fn occupants(&self, pos: usize) -> &[DotId] {
        self.buckets.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_occupied(&self, pos: usize) -> bool {
        !self.occupants(pos).is_empty()
    }

    pub fn insert(&mut self, pos: usize, id: DotId) {
        let Some(bucket) = self.buckets.get_mut(pos) else {
            panic!("position index: cell {pos} is off the track (dot {id})");
        };
        bucket.push(id);
    }

    pub fn remove(&mut self, pos: usize, id: DotId) {
        let bucket = self
            .buckets
            .get_mut(pos)
            .unwrap_or_else(|| panic!("position index: cell {pos} is off the track (dot {id})"));
        let Some(slot) = bucket.iter().position(|&d| d == id) else {
            panic!("position index: dot {id} is not in bucket {pos}");
        };
        bucket.swap_remove(slot);
    }

    /// Move `id` from one bucket to another
    pub fn relocate(&mut self, id: DotId, from: usize, to: usize) {
        self.remove(from, id);
        self.insert(to, id);
    }

    /// Empty the bucket at `pos`, returning its dots
    pub fn take(&mut self, pos: usize) -> Vec<DotId> {
        self.buckets
            .get_mut(pos)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Total dots across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Iterate `(cell, dot)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, DotId)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(pos, bucket)| bucket.iter().map(move |&id| (pos, id)))
    }
}
