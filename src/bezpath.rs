// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths made of lines and cubics, possibly with multiple subpaths.

use core::cell::{Ref, RefCell};

use crate::{ArclenConfig, CubicBez, PathError, PathProperties, Point, UserInfo};

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a cubic bezier using the current location and the two control
    /// points.
    CurveTo(Point, Point, Point),
    /// Close off the path, drawing a line back to the subpath's `MoveTo`.
    ClosePath,
}

impl PathEl {
    /// The point this element ends at, or `None` for `ClosePath`, which ends
    /// wherever its subpath started.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        }
    }
}

/// A path of lines and cubic Béziers, with cached geometry queries.
///
/// The path owns a [`PathProperties`] cache of the lengths, subpath ranges
/// and other results computed by its query methods. Every method that
/// changes the elements also invalidates the affected part of that cache.
///
/// Queries take `&self` and fill the cache through a [`RefCell`], so a
/// `BezPath` can be sent to another thread but not shared between threads;
/// wrap it in a `Mutex` to share it.
#[derive(Debug, Default)]
pub struct BezPath {
    elements: Vec<PathEl>,
    pub(crate) properties: RefCell<PathProperties>,
    user_info: UserInfo,
    pub(crate) config: ArclenConfig,
}

impl Clone for BezPath {
    /// Clones the elements, the arc length configuration and a shallow copy
    /// of the [`UserInfo`]. The clone starts with an empty cache.
    fn clone(&self) -> Self {
        BezPath {
            elements: self.elements.clone(),
            ..self.derived()
        }
    }
}

impl BezPath {
    /// Create a new path.
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(elements: Vec<PathEl>) -> BezPath {
        BezPath {
            elements,
            ..BezPath::default()
        }
    }

    /// Create an empty path with the given arc length configuration.
    pub fn with_config(config: ArclenConfig) -> BezPath {
        BezPath {
            config,
            ..BezPath::default()
        }
    }

    /// An empty path carrying this path's configuration and user info.
    pub(crate) fn derived(&self) -> BezPath {
        BezPath {
            elements: Vec::new(),
            properties: RefCell::default(),
            user_info: self.user_info.clone(),
            config: self.config,
        }
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        let index = self.elements.len();
        self.elements.push(el);
        self.properties.get_mut().invalidate_from(index);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<PathEl> {
        let el = self.elements.pop()?;
        let index = self.elements.len();
        self.properties.get_mut().invalidate_from(index);
        Some(el)
    }

    /// Shorten the path to `len` elements.
    pub fn truncate(&mut self, len: usize) {
        if len < self.elements.len() {
            self.elements.truncate(len);
            self.properties.get_mut().invalidate_from(len);
        }
    }

    /// Replace the element at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn set_element(&mut self, index: usize, el: PathEl) -> Result<PathEl, PathError> {
        self.check_index(index)?;
        let old = core::mem::replace(&mut self.elements[index], el);
        self.properties.get_mut().invalidate_from(index);
        Ok(old)
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.properties.get_mut().reset();
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.elements
    }

    /// Number of elements, including `MoveTo` and `ClosePath`.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the path has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The cached query results.
    ///
    /// # Panics
    ///
    /// Panics if the returned guard is still alive when a query needs to
    /// update the cache.
    pub fn properties(&self) -> Ref<'_, PathProperties> {
        self.properties.borrow()
    }

    /// The caller data attached to this path.
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    /// Mutable access to the caller data attached to this path.
    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.user_info
    }

    /// The arc length configuration used by the length queries.
    pub fn arclen_config(&self) -> ArclenConfig {
        self.config
    }

    /// Change the arc length configuration, discarding cached lengths.
    pub fn set_arclen_config(&mut self, config: ArclenConfig) {
        if config != self.config {
            self.config = config;
            self.properties.get_mut().reset();
        }
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), PathError> {
        if index < self.elements.len() {
            Ok(())
        } else {
            Err(PathError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            })
        }
    }

    /// The pen position just before element `index` is drawn.
    ///
    /// Before the first element this is the origin. After a `ClosePath` it
    /// is the start of the closed subpath. `index` may be `self.len()`, which
    /// gives the position at the end of the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if `index > self.len()`.
    pub fn current_point(&self, index: usize) -> Result<Point, PathError> {
        if index > self.elements.len() {
            return Err(PathError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        Ok(self.current_point_unchecked(index))
    }

    pub(crate) fn current_point_unchecked(&self, index: usize) -> Point {
        let Some(prev) = index.checked_sub(1) else {
            return Point::ZERO;
        };
        match self.elements[prev].end_point() {
            Some(p) => p,
            None => self.subpath_start(prev),
        }
    }

    /// The point the subpath containing element `index` starts at.
    pub(crate) fn subpath_start(&self, index: usize) -> Point {
        let start = self.subpath_range_unchecked(index).start;
        match self.elements[start] {
            PathEl::MoveTo(p) => p,
            // Only possible if the path doesn't begin with a MoveTo, in which
            // case the pen starts at the origin.
            _ => Point::ZERO,
        }
    }

    /// The element at `index` as a cubic Bézier.
    ///
    /// Lines (including the implicit line drawn by `ClosePath`) become cubics
    /// with their control points on the ends, and `MoveTo` becomes a cubic
    /// collapsed onto its point.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn segment(&self, index: usize) -> Result<CubicBez, PathError> {
        self.check_index(index)?;
        Ok(self.segment_unchecked(index))
    }

    pub(crate) fn segment_unchecked(&self, index: usize) -> CubicBez {
        match self.elements[index] {
            PathEl::MoveTo(p) => CubicBez::from_point(p),
            PathEl::LineTo(p) => CubicBez::from_line(self.current_point_unchecked(index), p),
            PathEl::CurveTo(p1, p2, p3) => {
                CubicBez::new(self.current_point_unchecked(index), p1, p2, p3)
            }
            PathEl::ClosePath => CubicBez::from_line(
                self.current_point_unchecked(index),
                self.subpath_start(index),
            ),
        }
    }

    /// Iterate over every element as a cubic Bézier.
    ///
    /// See [`segment`](Self::segment) for how elements are converted.
    pub fn segments(&self) -> impl Iterator<Item = CubicBez> + '_ {
        (0..self.elements.len()).map(|ix| self.segment_unchecked(ix))
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath::from_vec(iter.into_iter().collect())
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        let index = self.elements.len();
        self.elements.extend(iter);
        self.properties.get_mut().invalidate_from(index);
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().copied()
    }
}
