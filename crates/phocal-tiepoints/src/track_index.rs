use std::collections::HashMap;

use crate::source::TiePoint;

/// Lookup from track id to the index of its tiepoint.
#[derive(Debug, Clone, Default)]
pub struct TrackIndex {
    index: HashMap<u64, usize>,
}

impl TrackIndex {
    /// Build the lookup for a list of tiepoints.
    ///
    /// When a track id appears more than once the first point wins.
    pub fn new(points: &[TiePoint]) -> Self {
        let mut index = HashMap::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            index.entry(point.track_id).or_insert(i);
        }
        Self { index }
    }

    /// Index of the tiepoint of `track_id`.
    #[inline]
    pub fn get(&self, track_id: u64) -> Option<usize> {
        self.index.get(&track_id).copied()
    }

    /// Number of indexed tracks.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no track is indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
