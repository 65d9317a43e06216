// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized per-element results for one path.

use core::cmp::Ordering;
use core::ops::Range;
use std::collections::HashMap;

use log::trace;
use smallvec::SmallVec;

use crate::{LengthCache, Point};

/// Values computed at different accuracies, as `(accuracy, value)` pairs.
type ToleranceEntries = SmallVec<[(f64, f64); 2]>;

/// Cached query results for a single [`BezPath`](crate::BezPath).
///
/// All keys are element indices into the owning path, so the owner has to
/// call [`invalidate_from`](Self::invalidate_from) or [`reset`](Self::reset)
/// whenever its elements change. `BezPath` does this from all of its
/// mutating methods.
///
/// Lengths are stored together with the accuracy they were computed at. A
/// lookup returns the value stored at exactly the requested accuracy if there
/// is one, otherwise the value stored at the tightest accuracy that is still
/// at least as tight as the request. A request tighter than anything stored
/// misses.
#[derive(Clone, Debug, Default)]
pub struct PathProperties {
    lengths: HashMap<usize, ToleranceEntries>,
    lengths_through: HashMap<usize, ToleranceEntries>,
    lengths_through_at_t: HashMap<(usize, u64, u64), f64>,
    length_searches: HashMap<usize, LengthCache>,
    position_changes: HashMap<usize, bool>,
    subpath_ranges: SmallVec<[Range<usize>; 4]>,
    last_point: Option<Point>,
    is_closed: Option<bool>,
    tangent_at_end: Option<f64>,
}

fn lookup(entries: Option<&ToleranceEntries>, accuracy: f64) -> Option<f64> {
    let entries = entries?;
    if let Some(&(_, value)) = entries.iter().find(|(acc, _)| *acc == accuracy) {
        return Some(value);
    }
    entries
        .iter()
        .filter(|(acc, _)| *acc <= accuracy)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
        .map(|&(_, value)| value)
}

fn store(entries: &mut ToleranceEntries, accuracy: f64, value: f64) {
    match entries.iter_mut().find(|(acc, _)| *acc == accuracy) {
        Some(entry) => entry.1 = value,
        None => entries.push((accuracy, value)),
    }
}

impl PathProperties {
    /// Create an empty cache.
    pub fn new() -> Self {
        PathProperties::default()
    }

    /// Remember the length of element `index` alone.
    pub fn cache_length(&mut self, length: f64, index: usize, accuracy: f64) {
        store(self.lengths.entry(index).or_default(), accuracy, length);
    }

    /// The remembered length of element `index` alone.
    pub fn cached_length(&self, index: usize, accuracy: f64) -> Option<f64> {
        lookup(self.lengths.get(&index), accuracy)
    }

    /// Remember the length of the path from its start through the end of
    /// element `index`.
    pub fn cache_length_through_element(&mut self, length: f64, index: usize, accuracy: f64) {
        store(self.lengths_through.entry(index).or_default(), accuracy, length);
    }

    /// The remembered length of the path through element `index`.
    pub fn cached_length_through_element(&self, index: usize, accuracy: f64) -> Option<f64> {
        lookup(self.lengths_through.get(&index), accuracy)
    }

    /// Remember the length of the path from its start to parameter `t` of
    /// element `index`.
    ///
    /// Unlike whole-element lengths, these are only found again with the
    /// exact same `t` and `accuracy`.
    pub fn cache_length_through_element_at_t(
        &mut self,
        length: f64,
        index: usize,
        t: f64,
        accuracy: f64,
    ) {
        self.lengths_through_at_t
            .insert((index, t.to_bits(), accuracy.to_bits()), length);
    }

    /// The remembered length of the path to parameter `t` of element `index`.
    pub fn cached_length_through_element_at_t(
        &self,
        index: usize,
        t: f64,
        accuracy: f64,
    ) -> Option<f64> {
        self.lengths_through_at_t
            .get(&(index, t.to_bits(), accuracy.to_bits()))
            .copied()
    }

    /// The partial lengths remembered from searching element `index` for a
    /// length.
    pub fn length_search(&self, index: usize) -> Option<&LengthCache> {
        self.length_searches.get(&index)
    }

    /// Take the length search cache of element `index` out, to fill it.
    ///
    /// Returns an empty cache if there is none; hand it back with
    /// [`store_length_search`](Self::store_length_search).
    pub fn take_length_search(&mut self, index: usize) -> LengthCache {
        self.length_searches.remove(&index).unwrap_or_default()
    }

    /// Keep `cache` as the length search cache of element `index`.
    pub fn store_length_search(&mut self, index: usize, cache: LengthCache) {
        self.length_searches.insert(index, cache);
    }

    /// Remember whether traversing element `index` moves the pen.
    pub fn cache_position_change(&mut self, index: usize, changes: bool) {
        self.position_changes.insert(index, changes);
    }

    /// Whether traversing element `index` moves the pen, or `None` if that
    /// is not known yet.
    pub fn cached_position_change(&self, index: usize) -> Option<bool> {
        self.position_changes.get(&index).copied()
    }

    /// Append the range of the next subpath.
    ///
    /// Ranges are recorded in order and must be contiguous: `range.start`
    /// has to equal [`subpath_ranges_end`](Self::subpath_ranges_end).
    pub fn record_subpath_range(&mut self, range: Range<usize>) {
        debug_assert_eq!(
            range.start,
            self.subpath_ranges_end(),
            "subpath ranges must be recorded in order"
        );
        self.subpath_ranges.push(range);
    }

    /// The recorded subpath range containing element `index`, if the
    /// recorded ranges reach that far.
    pub fn cached_subpath_range(&self, index: usize) -> Option<Range<usize>> {
        self.subpath_ranges
            .binary_search_by(|range| {
                if range.end <= index {
                    Ordering::Less
                } else if range.start > index {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|ix| self.subpath_ranges[ix].clone())
    }

    /// The first element index not covered by a recorded subpath range.
    pub fn subpath_ranges_end(&self) -> usize {
        self.subpath_ranges.last().map_or(0, |range| range.end)
    }

    /// The remembered end point of the whole path.
    pub fn cached_last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Remember the end point of the whole path.
    pub fn cache_last_point(&mut self, point: Point) {
        self.last_point = Some(point);
    }

    /// Whether the path is known to contain a closed subpath.
    pub fn cached_is_closed(&self) -> Option<bool> {
        self.is_closed
    }

    /// Remember whether the path contains a closed subpath.
    pub fn cache_is_closed(&mut self, closed: bool) {
        self.is_closed = Some(closed);
    }

    /// The remembered tangent angle at the end of the path.
    pub fn cached_tangent_at_end(&self) -> Option<f64> {
        self.tangent_at_end
    }

    /// Remember the tangent angle at the end of the path.
    pub fn cache_tangent_at_end(&mut self, angle: f64) {
        self.tangent_at_end = Some(angle);
    }

    /// Forget everything that may depend on element `index` or later ones.
    ///
    /// This drops every entry keyed at or after `index`, the subpath range
    /// that reaches `index` (it may now extend further or end earlier), and
    /// all whole-path values.
    pub fn invalidate_from(&mut self, index: usize) {
        trace!("invalidating path properties from element {index}");
        self.lengths.retain(|&ix, _| ix < index);
        self.lengths_through.retain(|&ix, _| ix < index);
        self.lengths_through_at_t.retain(|&(ix, _, _), _| ix < index);
        self.length_searches.retain(|&ix, _| ix < index);
        self.position_changes.retain(|&ix, _| ix < index);
        let keep = self
            .subpath_ranges
            .iter()
            .take_while(|range| range.end < index)
            .count();
        self.subpath_ranges.truncate(keep);
        self.last_point = None;
        self.is_closed = None;
        self.tangent_at_end = None;
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        trace!("resetting path properties");
        *self = PathProperties::default();
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
            && self.lengths_through.is_empty()
            && self.lengths_through_at_t.is_empty()
            && self.length_searches.is_empty()
            && self.position_changes.is_empty()
            && self.subpath_ranges.is_empty()
            && self.last_point.is_none()
            && self.is_closed.is_none()
            && self.tangent_at_end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::PathProperties;
    use crate::{LengthCache, Point};

    #[test]
    fn tolerance_policy() {
        let mut props = PathProperties::new();
        props.cache_length(10.0, 3, 0.1);
        assert_eq!(props.cached_length(3, 0.1), Some(10.0));
        // Looser requests can use a tighter value.
        assert_eq!(props.cached_length(3, 1.0), Some(10.0));
        // Tighter requests miss.
        assert_eq!(props.cached_length(3, 0.01), None);
        assert_eq!(props.cached_length(4, 1.0), None);

        props.cache_length(10.5, 3, 1.0);
        props.cache_length(9.99, 3, 0.01);
        // Exact matches win over tighter values.
        assert_eq!(props.cached_length(3, 1.0), Some(10.5));
        // Otherwise the tightest applicable value is used.
        assert_eq!(props.cached_length(3, 0.5), Some(9.99));
    }

    #[test]
    fn at_t_needs_exact_key() {
        let mut props = PathProperties::new();
        props.cache_length_through_element_at_t(4.0, 2, 0.5, 0.1);
        assert_eq!(props.cached_length_through_element_at_t(2, 0.5, 0.1), Some(4.0));
        assert_eq!(props.cached_length_through_element_at_t(2, 0.5, 1.0), None);
        assert_eq!(props.cached_length_through_element_at_t(2, 0.25, 0.1), None);
    }

    #[test]
    fn subpath_ranges() {
        let mut props = PathProperties::new();
        assert_eq!(props.subpath_ranges_end(), 0);
        props.record_subpath_range(0..3);
        props.record_subpath_range(3..4);
        props.record_subpath_range(4..9);
        assert_eq!(props.cached_subpath_range(0), Some(0..3));
        assert_eq!(props.cached_subpath_range(2), Some(0..3));
        assert_eq!(props.cached_subpath_range(3), Some(3..4));
        assert_eq!(props.cached_subpath_range(8), Some(4..9));
        assert_eq!(props.cached_subpath_range(9), None);
        assert_eq!(props.subpath_ranges_end(), 9);
    }

    #[test]
    fn invalidate_from_keeps_earlier_entries() {
        let mut props = PathProperties::new();
        for ix in 0..6 {
            props.cache_length(1.0, ix, 0.1);
            props.cache_length_through_element(ix as f64, ix, 0.1);
            props.cache_position_change(ix, true);
        }
        props.cache_length_through_element_at_t(0.5, 4, 0.5, 0.1);
        props.store_length_search(2, LengthCache::new());
        props.store_length_search(4, LengthCache::new());
        props.record_subpath_range(0..3);
        props.record_subpath_range(3..6);
        props.cache_last_point(Point::new(1.0, 2.0));
        props.cache_is_closed(false);
        props.cache_tangent_at_end(0.0);

        props.invalidate_from(4);
        assert_eq!(props.cached_length(3, 0.1), Some(1.0));
        assert_eq!(props.cached_length(4, 0.1), None);
        assert_eq!(props.cached_length_through_element(3, 0.1), Some(3.0));
        assert_eq!(props.cached_length_through_element(5, 0.1), None);
        assert_eq!(props.cached_length_through_element_at_t(4, 0.5, 0.1), None);
        assert!(props.length_search(2).is_some());
        assert!(props.length_search(4).is_none());
        assert_eq!(props.cached_position_change(3), Some(true));
        assert_eq!(props.cached_position_change(4), None);
        assert_eq!(props.cached_subpath_range(1), Some(0..3));
        assert_eq!(props.cached_subpath_range(3), None);
        assert_eq!(props.subpath_ranges_end(), 3);
        assert_eq!(props.cached_last_point(), None);
        assert_eq!(props.cached_is_closed(), None);
        assert_eq!(props.cached_tangent_at_end(), None);

        // A range ending exactly at the invalidated index may grow.
        props.invalidate_from(3);
        assert_eq!(props.subpath_ranges_end(), 0);

        props.reset();
        assert!(props.is_empty());
    }
}
