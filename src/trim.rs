// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extracting part of a path as a new path.

use log::trace;

use crate::{BezPath, CubicBez, ParamCurve, PathEl, PathError, Point};

/// Pen state of the path being built, relative to the path being trimmed.
struct TrimBuilder {
    path: BezPath,
    subpath_start: Point,
}

impl TrimBuilder {
    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
        self.subpath_start = p;
    }

    /// Append `piece`, the part of a source element `el` that is kept.
    ///
    /// `close_target` is where `el` would close to in the source path.
    fn push_piece(&mut self, el: PathEl, piece: CubicBez, close_target: Point) {
        match el {
            PathEl::MoveTo(_) => self.move_to(piece.p3),
            PathEl::LineTo(_) => self.path.line_to(piece.p3),
            PathEl::CurveTo(..) => self.path.curve_to(piece.p1, piece.p2, piece.p3),
            PathEl::ClosePath => self.push_close(piece.p3, close_target),
        }
    }

    /// A `ClosePath` is only kept if it still draws the same line, which
    /// needs both the piece and the new subpath to end at its target.
    fn push_close(&mut self, end: Point, close_target: Point) {
        if end == close_target && self.subpath_start == close_target {
            self.path.close_path();
        } else {
            self.path.line_to(end);
        }
    }
}

impl BezPath {
    /// The part of the path from parameter `from_t` of element `from_index`
    /// to parameter `to_t` of element `to_index`.
    ///
    /// The result starts with a `MoveTo` to the start of the trimmed
    /// range. Elements keep their kind: a trimmed line is still a line, and
    /// a `ClosePath` is kept unless the trim cut its subpath's start off,
    /// in which case it becomes a line to the same point. The new path
    /// shares this path's [`UserInfo`](crate::UserInfo) and arc length
    /// configuration, and starts with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if either index has no element,
    /// and [`PathError::InvalidRange`] if the end comes before the start.
    pub fn trimmed(
        &self,
        from_index: usize,
        from_t: f64,
        to_index: usize,
        to_t: f64,
    ) -> Result<BezPath, PathError> {
        self.check_index(from_index)?;
        self.check_index(to_index)?;
        if to_index < from_index || (to_index == from_index && to_t < from_t) {
            return Err(PathError::InvalidRange);
        }
        trace!("trimming path from ({from_index}, {from_t}) to ({to_index}, {to_t})");

        let elements = self.elements();
        let mut builder = TrimBuilder {
            path: self.derived(),
            subpath_start: Point::ZERO,
        };

        let from_el = elements[from_index];
        let from_seg = self.segment_unchecked(from_index);
        let head = if from_index == to_index {
            from_seg.subsegment(from_t..to_t)
        } else {
            from_seg.subdivide_at(from_t).1
        };
        builder.move_to(head.p0);
        if !matches!(from_el, PathEl::MoveTo(_)) {
            builder.push_piece(from_el, head, self.subpath_start(from_index));
        }
        if from_index == to_index {
            return Ok(builder.path);
        }

        for (index, &el) in elements
            .iter()
            .enumerate()
            .take(to_index)
            .skip(from_index + 1)
        {
            match el {
                PathEl::MoveTo(p) => builder.move_to(p),
                PathEl::ClosePath => {
                    let target = self.subpath_start(index);
                    builder.push_close(target, target);
                }
                _ => builder.path.push(el),
            }
        }

        let tail = self.segment_unchecked(to_index).subdivide_at(to_t).0;
        builder.push_piece(elements[to_index], tail, self.subpath_start(to_index));
        Ok(builder.path)
    }

    /// The path with everything before parameter `t` of element `index`
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn trimmed_from(&self, index: usize, t: f64) -> Result<BezPath, PathError> {
        self.check_index(index)?;
        self.trimmed(index, t, self.len() - 1, 1.0)
    }

    /// The path with everything after parameter `t` of element `index`
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element.
    pub fn trimmed_to(&self, index: usize, t: f64) -> Result<BezPath, PathError> {
        self.check_index(index)?;
        self.trimmed(0, 0.0, index, t)
    }

    /// The part of element `index` between `from_t` and `to_t`, as a path of
    /// its own.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if there is no such element,
    /// and [`PathError::InvalidRange`] if `to_t < from_t`.
    pub fn trimmed_element(
        &self,
        index: usize,
        from_t: f64,
        to_t: f64,
    ) -> Result<BezPath, PathError> {
        self.trimmed(index, from_t, index, to_t)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathError, Point};

    fn shapes() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.curve_to((15.0, 0.0), (20.0, 5.0), (20.0, 10.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path.move_to((30.0, 0.0));
        path.line_to((40.0, 0.0));
        path.line_to((40.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn full_range_reproduces_path() {
        let path = shapes();
        let last = path.len() - 1;
        let trimmed = path.trimmed(0, 0.0, last, 1.0).unwrap();
        assert_eq!(trimmed.elements(), path.elements());
        assert_eq!(trimmed.first_point(), path.first_point());
        assert_eq!(trimmed.last_point(), path.last_point());
    }

    #[test]
    fn head_cut_turns_close_into_line() {
        let path = shapes();
        let trimmed = path.trimmed_from(1, 0.5).unwrap();
        let els = trimmed.elements();
        assert_eq!(els[0], PathEl::MoveTo(Point::new(5.0, 0.0)));
        assert_eq!(els[1], PathEl::LineTo(Point::new(10.0, 0.0)));
        assert_eq!(els[2], path.elements()[2]);
        // The subpath no longer starts at the close target.
        assert_eq!(els[4], PathEl::LineTo(Point::new(0.0, 0.0)));
        // The second subpath is untouched.
        assert_eq!(els[5..], path.elements()[5..]);
        assert_eq!(trimmed.len(), path.len());
    }

    #[test]
    fn tail_cut() {
        let path = shapes();
        let trimmed = path.trimmed_to(2, 0.5).unwrap();
        assert_eq!(trimmed.len(), 3);
        let curve = path.segment(2).unwrap();
        let (left, _) = curve.subdivide_at(0.5);
        assert_eq!(
            trimmed.elements()[2],
            PathEl::CurveTo(left.p1, left.p2, left.p3)
        );
        assert_eq!(trimmed.last_point(), Some(left.p3));
        assert!(left.p3.distance(curve.eval(0.5)) < 1e-12);
        assert!(!trimmed.is_closed());

        // Ending partway along a close keeps a line.
        let trimmed = path.trimmed_to(4, 0.5).unwrap();
        assert_eq!(
            trimmed.elements()[4],
            PathEl::LineTo(Point::new(0.0, 5.0))
        );
    }

    #[test]
    fn single_element() {
        let path = shapes();
        let trimmed = path.trimmed_element(2, 0.25, 0.75).unwrap();
        let expected = path.segment(2).unwrap().subsegment(0.25..0.75);
        assert_eq!(
            trimmed.elements(),
            [
                PathEl::MoveTo(expected.p0),
                PathEl::CurveTo(expected.p1, expected.p2, expected.p3),
            ]
        );
        assert!((trimmed.length(1e-6) - expected.arclen(1e-6)).abs() < 1e-6);

        let trimmed = path.trimmed_element(1, 0.2, 0.2).unwrap();
        assert_eq!(trimmed.first_point(), trimmed.last_point());

        let trimmed = path.trimmed_element(5, 0.0, 1.0).unwrap();
        assert_eq!(trimmed.elements(), [PathEl::MoveTo(Point::new(30.0, 0.0))]);
    }

    #[test]
    fn range_starting_at_a_move() {
        let path = shapes();
        let trimmed = path.trimmed(5, 0.3, 7, 1.0).unwrap();
        assert_eq!(trimmed.elements(), &path.elements()[5..8]);
    }

    #[test]
    fn close_in_the_middle_is_kept() {
        let path = shapes();
        let trimmed = path.trimmed(0, 0.0, 6, 0.5).unwrap();
        assert_eq!(trimmed.elements()[4], PathEl::ClosePath);
        assert_eq!(trimmed.elements()[6], PathEl::LineTo(Point::new(35.0, 0.0)));
    }

    #[test]
    fn errors() {
        let path = shapes();
        assert_eq!(path.trimmed(3, 0.0, 2, 1.0).unwrap_err(), PathError::InvalidRange);
        assert_eq!(path.trimmed(2, 0.6, 2, 0.4).unwrap_err(), PathError::InvalidRange);
        assert_eq!(
            path.trimmed(0, 0.0, 9, 1.0).unwrap_err(),
            PathError::IndexOutOfRange { index: 9, len: 9 }
        );
        assert!(BezPath::new().trimmed_from(0, 0.0).is_err());
        assert!(BezPath::new().trimmed_to(0, 1.0).is_err());
    }

    #[test]
    fn shares_user_info() {
        let mut path = shapes();
        path.user_info_mut().insert("stroke", 1.5f64);
        let _ = path.length(0.1);
        let trimmed = path.trimmed_from(3, 0.0).unwrap();
        assert_eq!(trimmed.user_info().get::<f64>("stroke"), Some(&1.5));
        assert!(trimmed.properties().is_empty());
        let (Some(a), Some(b)) = (
            path.user_info().get_shared("stroke"),
            trimmed.user_info().get_shared("stroke"),
        ) else {
            panic!("missing value");
        };
        assert!(std::sync::Arc::ptr_eq(a, b));
    }
}
