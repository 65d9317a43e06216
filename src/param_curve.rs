// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits for curves parametrized by a scalar.

use core::ops::Range;

use crate::Point;

/// A curve parametrized by a scalar.
///
/// Generally `t` is in the range [0..1]. Values outside that range
/// extrapolate the curve's polynomial and are not otherwise checked.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    fn eval(&self, t: f64) -> Point;

    /// Get a subsegment of the curve for the given parameter range.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// Split the curve at `t` into the part before and the part after.
    ///
    /// The two halves meet at `self.eval(t)`.
    fn subdivide_at(&self, t: f64) -> (Self, Self) {
        (self.subsegment(0.0..t), self.subsegment(t..1.0))
    }

    /// Subdivide into halves.
    fn subdivide(&self) -> (Self, Self) {
        self.subdivide_at(0.5)
    }

    /// The start point.
    fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// The end point.
    fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A parametrized curve that can have its arc length measured.
pub trait ParamCurveArclen: ParamCurve {
    /// The arc length of the curve.
    ///
    /// The result is accurate to the given accuracy (subject to
    /// roundoff errors for ridiculously low values). Compute time
    /// may vary with accuracy, if the curve needs to be subdivided.
    fn arclen(&self, accuracy: f64) -> f64;

    /// Solve for the parameter that has the given arclength from the start.
    ///
    /// Lengths beyond the ends of the curve clamp to 0 and 1.
    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64;
}
