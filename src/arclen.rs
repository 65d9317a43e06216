// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc length of cubic Béziers, and splitting a cubic at a given length.

use log::{debug, trace};
use smallvec::SmallVec;

use crate::{CubicBez, ParamCurve, ParamCurveArclen};

/// Termination bounds for the arc length algorithms.
///
/// Both limits only matter for pathological input (non-finite coordinates,
/// extreme curvature, absurdly small accuracies); ordinary curves converge
/// long before either is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArclenConfig {
    /// Maximum recursion depth of the adaptive length estimate.
    ///
    /// A segment at this depth reports its estimate even if it is not yet
    /// flat within the requested accuracy.
    pub max_depth: usize,
    /// Maximum number of bisection steps when searching for a length.
    pub max_bisection_steps: usize,
}

impl ArclenConfig {
    /// Create a configuration with the given limits.
    pub const fn new(max_depth: usize, max_bisection_steps: usize) -> Self {
        ArclenConfig {
            max_depth,
            max_bisection_steps,
        }
    }
}

impl Default for ArclenConfig {
    fn default() -> Self {
        ArclenConfig::new(16, 64)
    }
}

/// The result of [`CubicBez::subdivide_at_length`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthSplit {
    /// The part of the curve before the split.
    pub left: CubicBez,
    /// The part of the curve after the split.
    pub right: CubicBez,
    /// The parameter the curve was split at.
    pub t: f64,
    /// The measured length of `left`.
    ///
    /// Within the requested accuracy of the target, except when the target
    /// is longer than the whole curve, in which case this is the length of
    /// the whole curve.
    pub length: f64,
}

/// Partial lengths of one curve, remembered between calls to
/// [`CubicBez::subdivide_at_length`].
///
/// The bisection visits the same parameters every time it searches the same
/// curve, so repeated searches (for example walking along a curve in fixed
/// steps) mostly hit this cache. Results are identical with or without it.
/// The cache forgets everything when used with a different curve, accuracy
/// or [`ArclenConfig`].
#[derive(Clone, Debug, Default)]
pub struct LengthCache {
    curve: Option<CubicBez>,
    accuracy: f64,
    config: ArclenConfig,
    samples: SmallVec<[(f64, f64); 16]>,
}

impl LengthCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        LengthCache::default()
    }

    /// Number of remembered partial lengths.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forget all partial lengths.
    pub fn clear(&mut self) {
        self.curve = None;
        self.samples.clear();
    }

    fn is_bound_to(&self, curve: &CubicBez, accuracy: f64, config: &ArclenConfig) -> bool {
        self.curve.as_ref() == Some(curve) && self.accuracy == accuracy && self.config == *config
    }

    fn bind(&mut self, curve: &CubicBez, accuracy: f64, config: &ArclenConfig) {
        if !self.is_bound_to(curve, accuracy, config) {
            self.samples.clear();
            self.curve = Some(*curve);
            self.accuracy = accuracy;
            self.config = *config;
        }
    }

    /// The remembered length of `curve` from its start to `t`, if this cache
    /// was last filled for that curve with the same accuracy and config.
    pub fn partial_length(
        &self,
        curve: &CubicBez,
        t: f64,
        accuracy: f64,
        config: &ArclenConfig,
    ) -> Option<f64> {
        if self.is_bound_to(curve, accuracy, config) {
            self.get(t)
        } else {
            None
        }
    }

    fn get(&self, t: f64) -> Option<f64> {
        self.samples
            .iter()
            .find(|(sample_t, _)| *sample_t == t)
            .map(|&(_, len)| len)
    }

    fn insert(&mut self, t: f64, len: f64) {
        self.samples.push((t, len));
    }
}

impl CubicBez {
    /// Arc length, with explicit termination bounds.
    ///
    /// The curve is compared against its chord: when the control polygon is
    /// no more than `accuracy` longer than the chord, the average of the two
    /// is the estimate. Otherwise the curve is halved and each half measured
    /// the same way, down to `config.max_depth`.
    pub fn arclen_with(&self, accuracy: f64, config: &ArclenConfig) -> f64 {
        fn rec(c: &CubicBez, accuracy: f64, depth: usize, max_depth: usize, capped: &mut bool) -> f64 {
            let chord = c.chord().length();
            let poly = c.polygon_length();
            let err = poly - chord;
            if err <= accuracy || !err.is_finite() {
                return 0.5 * (poly + chord);
            }
            if depth >= max_depth {
                *capped = true;
                return 0.5 * (poly + chord);
            }
            let (c0, c1) = c.subdivide();
            rec(&c0, accuracy, depth + 1, max_depth, capped)
                + rec(&c1, accuracy, depth + 1, max_depth, capped)
        }
        let mut capped = false;
        let len = rec(self, accuracy, 0, config.max_depth, &mut capped);
        if capped {
            trace!(
                "arclen of {self:?} stopped at depth {} before reaching accuracy {accuracy}",
                config.max_depth
            );
        }
        len
    }

    /// Split the curve where its arc length from the start reaches `length`.
    ///
    /// The split parameter is found by bisection; each step measures the
    /// left part with `accuracy`, and the search stops once that measurement
    /// is within `accuracy` of `length`. A `length` of zero or less splits at
    /// the start, a `length` at or beyond the whole curve's length returns
    /// the whole curve as `left`.
    ///
    /// Pass a [`LengthCache`] to reuse partial lengths across calls on the
    /// same curve.
    pub fn subdivide_at_length(
        &self,
        length: f64,
        accuracy: f64,
        config: &ArclenConfig,
        mut cache: Option<&mut LengthCache>,
    ) -> LengthSplit {
        if let Some(cache) = cache.as_deref_mut() {
            cache.bind(self, accuracy, config);
        }
        let mut partial = |t: f64, left: &CubicBez| -> f64 {
            if let Some(len) = cache.as_deref().and_then(|cache| cache.get(t)) {
                return len;
            }
            let len = left.arclen_with(accuracy, config);
            if let Some(cache) = cache.as_deref_mut() {
                cache.insert(t, len);
            }
            len
        };

        if length <= 0.0 {
            let (left, right) = self.subdivide_at(0.0);
            return LengthSplit {
                left,
                right,
                t: 0.0,
                length: 0.0,
            };
        }
        let total = partial(1.0, self);
        if length >= total {
            return LengthSplit {
                left: *self,
                right: CubicBez::from_point(self.p3),
                t: 1.0,
                length: total,
            };
        }

        let mut bottom = 0.0;
        let mut top = 1.0;
        let mut t = 0.5;
        let mut split = LengthSplit {
            left: *self,
            right: CubicBez::from_point(self.p3),
            t: 1.0,
            length: total,
        };
        for _ in 0..config.max_bisection_steps {
            let (left, right) = self.subdivide_at(t);
            let len = partial(t, &left);
            split = LengthSplit {
                left,
                right,
                t,
                length: len,
            };
            if (length - len).abs() < accuracy {
                return split;
            }
            if length > len {
                bottom = t;
            } else {
                top = t;
            }
            let next_t = 0.5 * (bottom + top);
            if next_t == t {
                return split;
            }
            t = next_t;
        }
        debug!(
            "subdivide_at_length gave up after {} steps: wanted {length}, got {}",
            config.max_bisection_steps, split.length
        );
        split
    }
}

impl ParamCurveArclen for CubicBez {
    /// Arc length of a cubic Bézier segment, using [`ArclenConfig::default`].
    fn arclen(&self, accuracy: f64) -> f64 {
        self.arclen_with(accuracy, &ArclenConfig::default())
    }

    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64 {
        self.subdivide_at_length(arclen, accuracy, &ArclenConfig::default(), None)
            .t
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{ArclenConfig, CubicBez, LengthCache, ParamCurve, ParamCurveArclen, Point};

    fn random_cubic(rng: &mut StdRng) -> CubicBez {
        let mut pt = || Point::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
        CubicBez::new(pt(), pt(), pt(), pt())
    }

    #[test]
    fn cubicbez_arclen() {
        // y = x^2
        let c = CubicBez::new((0.0, 0.0), (1.0 / 3.0, 0.0), (2.0 / 3.0, 1.0 / 3.0), (1.0, 1.0));
        let true_arclen = 0.5 * 5.0f64.sqrt() + 0.25 * (2.0 + 5.0f64.sqrt()).ln();
        for i in 1..8 {
            let accuracy = 0.1f64.powi(i);
            let error = c.arclen(accuracy) - true_arclen;
            assert!(error.abs() < accuracy, "accuracy {accuracy:e}: error {error:e}");
        }
    }

    #[test]
    fn straight_cubic_is_its_chord() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        assert_eq!(c.arclen(1e-9), 3.0);

        let c = CubicBez::new((0.0, 0.0), (10.0, 10.0), (20.0, 20.0), (30.0, 30.0));
        let chord = c.p0.distance(c.p3);
        assert!((c.arclen(1e-3) - chord).abs() < 1e-3);

        let dot = CubicBez::from_point(Point::new(4.0, 4.0));
        assert_eq!(dot.arclen(1e-3), 0.0);
    }

    #[test]
    fn arclen_additive() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let c = random_cubic(&mut rng);
            let t = rng.random_range(0.0..1.0);
            let accuracy = 1e-3;
            let (left, right) = c.subdivide_at(t);
            let whole = c.arclen(accuracy);
            let parts = left.arclen(accuracy) + right.arclen(accuracy);
            assert!(
                (whole - parts).abs() <= 2.0 * accuracy,
                "{c:?} at {t}: {whole} vs {parts}"
            );
        }
    }

    #[test]
    fn arclen_depth_cap_terminates() {
        let c = CubicBez::new((0.0, 0.0), (1e6, 1e6), (-1e6, 1e6), (1.0, 0.0));
        let shallow = ArclenConfig::new(2, 64);
        let len = c.arclen_with(1e-12, &shallow);
        assert!(len.is_finite());
        assert!(len >= c.p0.distance(c.p3));

        let nan = CubicBez::new((0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (2.0, 0.0));
        assert!(nan.arclen(1e-3).is_nan());
    }

    #[test]
    fn subdivide_at_length_inverse() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = ArclenConfig::default();
        for _ in 0..20 {
            let c = random_cubic(&mut rng);
            let accuracy = 1e-2;
            let total = c.arclen(accuracy);
            for j in 1..10 {
                let target = total * f64::from(j) / 10.0;
                let split = c.subdivide_at_length(target, accuracy, &config, None);
                let measured = split.left.arclen(accuracy);
                assert_eq!(measured, split.length);
                assert!(
                    (measured - target).abs() < accuracy,
                    "{c:?}: wanted {target}, got {measured}"
                );
                assert_eq!(split.left.end(), split.right.start());
            }
        }
    }

    #[test]
    fn subdivide_at_length_ends() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        let config = ArclenConfig::default();
        let split = c.subdivide_at_length(-1.0, 0.1, &config, None);
        assert_eq!(split.t, 0.0);
        assert_eq!(split.length, 0.0);
        assert_eq!(split.right, c);

        let total = c.arclen(0.1);
        let split = c.subdivide_at_length(total * 2.0, 0.1, &config, None);
        assert_eq!(split.t, 1.0);
        assert_eq!(split.length, total);
        assert_eq!(split.left, c);
        assert!(split.right.is_point());
    }

    #[test]
    fn subdivide_at_length_step_cap() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        let accuracy = 1e-3;
        let target = c.arclen(accuracy) * 0.3;

        // One step only measures the midpoint, which is far from the target.
        let one_step = ArclenConfig::new(16, 1);
        let split = c.subdivide_at_length(target, accuracy, &one_step, None);
        assert_eq!(split.t, 0.5);
        assert!((split.length - target).abs() > accuracy);
        assert_eq!(split.length, split.left.arclen_with(accuracy, &one_step));

        // The last split tried is returned, not the best one.
        let two_steps = ArclenConfig::new(16, 2);
        let split = c.subdivide_at_length(target, accuracy, &two_steps, None);
        assert_eq!(split.t, 0.25);
        assert_eq!(split.left.end(), split.right.start());

        let split = c.subdivide_at_length(target, accuracy, &ArclenConfig::default(), None);
        assert!((split.length - target).abs() < accuracy);
    }

    #[test]
    fn length_cache_keyed_on_config() {
        let c = CubicBez::new((0.0, 0.0), (20.0, 90.0), (80.0, -30.0), (100.0, 40.0));
        let deep = ArclenConfig::default();
        let shallow = ArclenConfig::new(1, 64);
        let mut cache = LengthCache::new();
        let _ = c.subdivide_at_length(60.0, 1e-4, &deep, Some(&mut cache));
        assert!(cache.partial_length(&c, 1.0, 1e-4, &deep).is_some());
        assert!(cache.partial_length(&c, 1.0, 1e-4, &shallow).is_none());

        let reused = c.subdivide_at_length(60.0, 1e-4, &shallow, Some(&mut cache));
        let fresh = c.subdivide_at_length(60.0, 1e-4, &shallow, None);
        assert_eq!(reused, fresh);
        assert!(cache.partial_length(&c, 1.0, 1e-4, &deep).is_none());
    }

    #[test]
    fn length_cache_matches_uncached() {
        let c = CubicBez::new((0.0, 0.0), (20.0, 90.0), (80.0, -30.0), (100.0, 40.0));
        let config = ArclenConfig::default();
        let mut cache = LengthCache::new();
        let total = c.arclen(0.01);
        for j in 0..=20 {
            let target = total * f64::from(j) / 20.0;
            let uncached = c.subdivide_at_length(target, 0.01, &config, None);
            let cached = c.subdivide_at_length(target, 0.01, &config, Some(&mut cache));
            assert_eq!(uncached, cached);
        }
        assert!(!cache.is_empty());

        // A different curve starts over.
        let other = c.reverse();
        let _ = other.subdivide_at_length(total * 0.5, 0.01, &config, Some(&mut cache));
        let fresh = other.subdivide_at_length(total * 0.5, 0.01, &config, None);
        let reused = other.subdivide_at_length(total * 0.5, 0.01, &config, Some(&mut cache));
        assert_eq!(fresh, reused);
    }

    #[test]
    fn inv_arclen_midpoint_of_symmetric_curve() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0));
        let total = c.arclen(1e-6);
        let t = c.inv_arclen(total * 0.5, 1e-6);
        assert!((t - 0.5).abs() < 1e-6, "{t}");
    }
}
