// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::Range;

use crate::{ParamCurve, ParamCurveArclen, Point};

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        self.arclen(1.0)
    }

    /// Distance from `p` to the infinite line through `p0` and `p1`.
    ///
    /// If the line is degenerate (both points equal) this is the distance
    /// from `p` to that point.
    pub fn perpendicular_distance(self, p: Point) -> f64 {
        let d = self.p1 - self.p0;
        let len = d.hypot();
        if len == 0.0 {
            return p.distance(self.p0);
        }
        (d.cross(p - self.p0) / len).abs()
    }

    /// Computes the point where two line segments intersect.
    ///
    /// Returns `None` if the segments are parallel or coincident, or if the
    /// crossing point of their supporting lines is not on both segments.
    pub fn intersect_segment(self, other: Line) -> Option<Point> {
        let r = self.p1 - self.p0;
        let s = other.p1 - other.p0;
        let denom = r.cross(s);
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        let qp = other.p0 - self.p0;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.eval(t))
        } else {
            None
        }
    }
}

/// Intersection of segment `a`-`b` with segment `c`-`d`.
///
/// `None` plays the role of a "not found" sentinel; see
/// [`Line::intersect_segment`].
#[inline]
pub fn line_segment_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    Line::new(a, b).intersect_segment(Line::new(c, d))
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline]
    fn subdivide_at(&self, t: f64) -> (Line, Line) {
        let pm = self.eval(t);
        (Line::new(self.p0, pm), Line::new(pm, self.p1))
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveArclen for Line {
    #[inline]
    fn arclen(&self, _accuracy: f64) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    fn inv_arclen(&self, arclen: f64, _accuracy: f64) -> f64 {
        let len = self.arclen(1.0);
        if len == 0.0 {
            return 0.0;
        }
        (arclen / len).clamp(0.0, 1.0)
    }
}
