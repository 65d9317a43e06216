// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier paths with cached geometry queries.
//!
//! The perfbez library measures and cuts paths made of lines and cubic
//! Bézier curves: arc lengths, points and tangents along the path, finding
//! where a given length is reached, and trimming a path to part of itself.
//! Each [`BezPath`] remembers the per-element results of these queries in
//! its [`PathProperties`], so asking again is cheap, and forgets exactly the
//! results affected when the path is changed.
//!
//! # Examples
//!
//! Measuring a path and finding a point along it:
//! ```
//! use perfbez::{BezPath, Point};
//!
//! const ACCURACY: f64 = 1e-3;
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((100.0, 0.0));
//! path.curve_to((150.0, 0.0), (150.0, 50.0), (100.0, 50.0));
//!
//! let total = path.length(ACCURACY);
//! assert!(total > 150.0);
//!
//! // Halfway along the straight part.
//! let p = path.point_at_length(50.0, ACCURACY).unwrap();
//! assert!(p.distance(Point::new(50.0, 0.0)) < 0.01);
//!
//! // Cut the path at the start of the curve.
//! let straight = path.trimmed_to(1, 1.0).unwrap();
//! assert_eq!(straight.last_point(), Some(Point::new(100.0, 0.0)));
//! ```
//!
//! Working with single curves:
//! ```
//! use perfbez::{line_segment_intersection, CubicBez, ParamCurve, ParamCurveArclen, Point};
//!
//! let c = CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
//! let (left, right) = c.subdivide_at(0.5);
//! assert_eq!(left.end(), right.start());
//! let len = c.arclen(1e-6);
//! assert!((left.arclen(1e-6) + right.arclen(1e-6) - len).abs() < 2e-6);
//!
//! let hit = line_segment_intersection(
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(10.0, 0.0),
//! );
//! assert_eq!(hit, Some(Point::new(5.0, 5.0)));
//! ```
//!
//! # Logging
//!
//! Diagnostics go through the [`log`] facade: cache invalidation and arc
//! length recursions that hit [`ArclenConfig::max_depth`] at `trace` level,
//! length searches that run out of [`ArclenConfig::max_bisection_steps`] at
//! `debug` level. No logger is installed by this crate.
//!
//! # Features
//!
//! - `serde`: `Serialize` and `Deserialize` for the value types.
//! - `schemars`: `JsonSchema` for the value types.
//! - `mint`: conversions between [`Point`] / [`Vec2`] and their [`mint`]
//!   equivalents.
//!
//! [`log`]: https://docs.rs/log
//! [`mint`]: https://docs.rs/mint

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod arclen;
mod bezpath;
mod cubicbez;
mod error;
mod line;
mod param_curve;
mod point;
mod properties;
mod query;
mod trim;
mod user_info;
mod vec2;

pub use crate::arclen::*;
pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::error::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::properties::*;
pub use crate::user_info::*;
pub use crate::vec2::*;
