// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry queries on a [`BezPath`], memoized in its [`PathProperties`].
//!
//! [`PathProperties`]: crate::PathProperties

use core::ops::Range;

use crate::{BezPath, ParamCurve, PathEl, PathError, Point, Vec2};

impl BezPath {
    /// The point the path starts at.
    ///
    /// This is the point of the initial `MoveTo`, or `None` for an empty
    /// path.
    pub fn first_point(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(self.segment_unchecked(0).p0)
    }

    /// The point the path ends at.
    ///
    /// If the path ends with `ClosePath`, this is the start of the closed
    /// subpath. `None` for an empty path.
    pub fn last_point(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let cached = self.properties.borrow().cached_last_point();
        if cached.is_some() {
            return cached;
        }
        let point = self.current_point_unchecked(self.len());
        self.properties.borrow_mut().cache_last_point(point);
        Some(point)
    }

    /// Returns `true` if any subpath ends with `ClosePath`.
    pub fn is_closed(&self) -> bool {
        let cached = self.properties.borrow().cached_is_closed();
        if let Some(closed) = cached {
            return closed;
        }
        let closed = self.elements().contains(&PathEl::ClosePath);
        self.properties.borrow_mut().cache_is_closed(closed);
        closed
    }

    /// The direction the path is heading at its very end, in radians.
    ///
    /// Trailing elements that don't move the pen are skipped. A path that
    /// never moves the pen reports `0.0`.
    pub fn tangent_at_end(&self) -> f64 {
        let cached = self.properties.borrow().cached_tangent_at_end();
        if let Some(angle) = cached {
            return angle;
        }
        let angle = (0..self.len())
            .rev()
            .map(|ix| self.segment_unchecked(ix))
            .find(|seg| !seg.is_point())
            .map_or(0.0, |seg| seg.tangent(1.0).atan2());
        self.properties.borrow_mut().cache_tangent_at_end(angle);
        angle
    }

    /// The total length of the path.
    ///
    /// Each element is measured to within `accuracy`.
    pub fn length(&self, accuracy: f64) -> f64 {
        match self.len().checked_sub(1) {
            Some(last) => self.length_through_unchecked(last, accuracy),
            None => 0.0,
        }
    }

    /// The length of element `index` on its own.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn length_of_element(&self, index: usize, accuracy: f64) -> Result<f64, PathError> {
        self.check_index(index)?;
        Ok(self.length_of_element_unchecked(index, accuracy))
    }

    fn length_of_element_unchecked(&self, index: usize, accuracy: f64) -> f64 {
        let cached = self.properties.borrow().cached_length(index, accuracy);
        if let Some(length) = cached {
            return length;
        }
        let length = self
            .segment_unchecked(index)
            .arclen_with(accuracy, &self.config);
        self.properties
            .borrow_mut()
            .cache_length(length, index, accuracy);
        length
    }

    /// The length of the path from its start through the end of element
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn length_through_element(&self, index: usize, accuracy: f64) -> Result<f64, PathError> {
        self.check_index(index)?;
        Ok(self.length_through_unchecked(index, accuracy))
    }

    fn length_through_unchecked(&self, index: usize, accuracy: f64) -> f64 {
        // Resume from the closest cached total at or before `index`.
        let (mut next, mut total) = {
            let props = self.properties.borrow();
            (0..=index)
                .rev()
                .find_map(|ix| {
                    props
                        .cached_length_through_element(ix, accuracy)
                        .map(|total| (ix + 1, total))
                })
                .unwrap_or((0, 0.0))
        };
        while next <= index {
            total += self.length_of_element_unchecked(next, accuracy);
            self.properties
                .borrow_mut()
                .cache_length_through_element(total, next, accuracy);
            next += 1;
        }
        total
    }

    /// The length of the path from its start to parameter `t` of element
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn length_through_element_at_t(
        &self,
        index: usize,
        t: f64,
        accuracy: f64,
    ) -> Result<f64, PathError> {
        self.check_index(index)?;
        let cached = self
            .properties
            .borrow()
            .cached_length_through_element_at_t(index, t, accuracy);
        if let Some(length) = cached {
            return Ok(length);
        }
        let before = match index.checked_sub(1) {
            Some(prev) => self.length_through_unchecked(prev, accuracy),
            None => 0.0,
        };
        let seg = self.segment_unchecked(index);
        // Parameters returned by `element_at_length` were measured there.
        let searched = self
            .properties
            .borrow()
            .length_search(index)
            .and_then(|cache| cache.partial_length(&seg, t, accuracy, &self.config));
        let partial = match searched {
            Some(partial) => partial,
            None => seg.subdivide_at(t).0.arclen_with(accuracy, &self.config),
        };
        let length = before + partial;
        self.properties
            .borrow_mut()
            .cache_length_through_element_at_t(length, index, t, accuracy);
        Ok(length)
    }

    /// Find the element and parameter at which the path has covered `length`.
    ///
    /// Lengths outside the path clamp to its ends. The partial lengths
    /// measured while searching an element are kept in the path's
    /// [`PathProperties`](crate::PathProperties), so later searches of the
    /// same element, and [`length_through_element_at_t`] at the returned
    /// parameter, reuse them.
    ///
    /// [`length_through_element_at_t`]: Self::length_through_element_at_t
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if the path is empty.
    pub fn element_at_length(&self, length: f64, accuracy: f64) -> Result<(usize, f64), PathError> {
        self.check_index(0)?;
        let total = self.length(accuracy);
        let length = length.clamp(0.0, total);

        // First element whose running total reaches `length`.
        let (mut lo, mut hi) = (0, self.len() - 1);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.length_through_unchecked(mid, accuracy) < length {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let index = lo;
        let before = match index.checked_sub(1) {
            Some(prev) => self.length_through_unchecked(prev, accuracy),
            None => 0.0,
        };
        let seg = self.segment_unchecked(index);
        let mut search = self.properties.borrow_mut().take_length_search(index);
        let split =
            seg.subdivide_at_length(length - before, accuracy, &self.config, Some(&mut search));
        self.properties.borrow_mut().store_length_search(index, search);
        Ok((index, split.t))
    }

    /// The point at which the path has covered `length`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if the path is empty.
    pub fn point_at_length(&self, length: f64, accuracy: f64) -> Result<Point, PathError> {
        let (index, t) = self.element_at_length(length, accuracy)?;
        Ok(self.segment_unchecked(index).eval(t))
    }

    /// The tangent of element `index` at parameter `t`, not normalized.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn tangent_at(&self, index: usize, t: f64) -> Result<Vec2, PathError> {
        Ok(self.segment(index)?.tangent(t))
    }

    /// The point on element `index` at parameter `t`, and the direction of
    /// the path there in radians.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn point_and_tangent_at(&self, index: usize, t: f64) -> Result<(Point, f64), PathError> {
        let seg = self.segment(index)?;
        Ok((seg.eval(t), seg.tangent(t).atan2()))
    }

    /// The range of element indices making up the subpath that contains
    /// element `index`.
    ///
    /// A subpath runs from a `MoveTo` up to, not including, the next
    /// `MoveTo` or the end of the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn subpath_range(&self, index: usize) -> Result<Range<usize>, PathError> {
        self.check_index(index)?;
        Ok(self.subpath_range_unchecked(index))
    }

    pub(crate) fn subpath_range_unchecked(&self, index: usize) -> Range<usize> {
        let cached = self.properties.borrow().cached_subpath_range(index);
        if let Some(range) = cached {
            return range;
        }
        let elements = self.elements();
        let mut props = self.properties.borrow_mut();
        loop {
            let start = props.subpath_ranges_end();
            let end = (start + 1..elements.len())
                .find(|&ix| matches!(elements[ix], PathEl::MoveTo(_)))
                .unwrap_or(elements.len());
            props.record_subpath_range(start..end);
            if index < end {
                return start..end;
            }
        }
    }

    /// Returns `false` if drawing element `index` leaves the pen where it
    /// was and draws nothing, as for a `MoveTo`, a line to the current point,
    /// or a curve whose control points all sit on the current point.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn changes_position_during_element(&self, index: usize) -> Result<bool, PathError> {
        self.check_index(index)?;
        let cached = self.properties.borrow().cached_position_change(index);
        if let Some(changes) = cached {
            return Ok(changes);
        }
        let changes = !self.segment_unchecked(index).is_point();
        self.properties
            .borrow_mut()
            .cache_position_change(index, changes);
        Ok(changes)
    }
}
