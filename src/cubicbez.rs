// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::Range;

use crate::{Line, ParamCurve, Point, Vec2};

/// A single cubic Bézier segment.
///
/// Every element of a [`BezPath`](crate::BezPath) resolves to one of these.
/// Lines are represented with the control points collapsed onto the ends,
/// and a lone point with all four points equal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// The cubic form of a straight line from `p0` to `p1`.
    #[inline]
    pub fn from_line(p0: Point, p1: Point) -> CubicBez {
        CubicBez::new(p0, p0, p1, p1)
    }

    /// A degenerate cubic sitting at a single point.
    #[inline]
    pub fn from_point(p: Point) -> CubicBez {
        CubicBez::new(p, p, p, p)
    }

    /// Returns `true` if all four points coincide exactly.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.p0 == self.p1 && self.p0 == self.p2 && self.p0 == self.p3
    }

    /// The straight line from start to end.
    #[inline]
    pub fn chord(&self) -> Line {
        Line::new(self.p0, self.p3)
    }

    /// The length of the control polygon, `p0 → p1 → p2 → p3`.
    #[inline]
    pub fn polygon_length(&self) -> f64 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Returns a new `CubicBez` describing the same curve traversed backwards.
    #[inline]
    #[must_use]
    pub fn reverse(&self) -> CubicBez {
        CubicBez::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// The derivative at `t`, as a direction vector.
    ///
    /// The result is not normalized. At the ends, a zero derivative (a
    /// control point sitting on its end point) is replaced by the direction
    /// towards the next distinct control point, so a line stored as
    /// `(a, a, b, b)` still points along `b - a` at both ends. Only a curve whose
    /// four points coincide returns [`Vec2::ZERO`] there.
    pub fn tangent(&self, t: f64) -> Vec2 {
        if t <= 0.0 {
            return [self.p1, self.p2, self.p3]
                .into_iter()
                .map(|p| p - self.p0)
                .find(|d| !d.is_zero())
                .map_or(Vec2::ZERO, |d| d * 3.0);
        }
        if t >= 1.0 {
            return [self.p2, self.p1, self.p0]
                .into_iter()
                .map(|p| self.p3 - p)
                .find(|d| !d.is_zero())
                .map_or(Vec2::ZERO, |d| d * 3.0);
        }
        let mt = 1.0 - t;
        let d01 = self.p1 - self.p0;
        let d12 = self.p2 - self.p1;
        let d23 = self.p3 - self.p2;
        (d01 * (mt * mt) + d12 * (2.0 * mt * t) + d23 * (t * t)) * 3.0
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let (_, tail) = self.subdivide_at(t0);
        if t0 >= 1.0 {
            return tail;
        }
        let (mid, _) = tail.subdivide_at((t1 - t0) / (1.0 - t0));
        mid
    }

    /// Split at `t` using de Casteljau's algorithm.
    ///
    /// The left half ends at exactly the point the right half starts from.
    fn subdivide_at(&self, t: f64) -> (CubicBez, CubicBez) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let pm = p012.lerp(p123, t);
        (
            CubicBez::new(self.p0, p01, p012, pm),
            CubicBez::new(pm, p123, p23, self.p3),
        )
    }
}
