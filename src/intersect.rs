// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between pairs of path segments.
//!
//! Line pairings with a line or a cubic are solved analytically. Every other
//! pairing is found by recursive bisection of the two parameter intervals,
//! pruning sub-intervals whose bounding boxes are disjoint.

use alloc::vec::Vec;
use core::ops::Range;

use arrayvec::ArrayVec;
use log::trace;

use crate::common::{in_unit_range, solve_cubic_bernstein};
use crate::{Affine, CubicBez, Line, ParamCurve, ParamCurveExtrema, PathSeg, Point, Rect};

/// The largest number of isolated intersections two segments can have.
///
/// This is the Bézout bound for a pair of cubics.
pub const MAX_INTERSECTIONS: usize = 9;

/// Tunable tolerances of the intersection search.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionConfig {
    /// Two intersection points closer than this are reported once.
    pub proximity: f64,
    /// Bisection stops refining once both bounding boxes are narrower and
    /// shorter than this.
    pub converge_size: f64,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        IntersectionConfig {
            proximity: 0.1,
            converge_size: 0.1,
        }
    }
}

/// A single intersection of two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// Parameter on the first segment.
    pub t1: f64,
    /// Parameter on the second segment.
    pub t2: f64,
    /// The intersection point, evaluated on the first segment.
    pub point: Point,
}

/// The intersections found between two segments.
///
/// The collection never holds more than the capacity requested by the
/// caller, and never two points within the configured proximity of each
/// other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections {
    found: ArrayVec<Intersection, MAX_INTERSECTIONS>,
    capacity: usize,
    truncated: bool,
}

impl Intersections {
    fn with_capacity(capacity: usize) -> Intersections {
        Intersections {
            found: ArrayVec::new(),
            capacity: capacity.min(MAX_INTERSECTIONS),
            truncated: false,
        }
    }

    fn is_full(&self) -> bool {
        self.found.len() >= self.capacity
    }

    /// Record an intersection unless one within `proximity` is already known.
    ///
    /// Returns `false` once the collection is full.
    fn push_distinct(&mut self, candidate: Intersection, proximity: f64) -> bool {
        if self
            .found
            .iter()
            .any(|old| old.point.distance(candidate.point) < proximity)
        {
            return !self.is_full();
        }
        if self.is_full() {
            self.truncated = true;
            return false;
        }
        self.found.push(candidate);
        !self.is_full()
    }

    /// The number of intersections found.
    #[inline]
    pub fn len(&self) -> usize {
        self.found.len()
    }

    /// Whether no intersection was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// The effective capacity: the requested one, limited by the number of
    /// intersections the pair of segment kinds can have.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the search stopped at capacity while more intersections may
    /// exist.
    ///
    /// When this is `false` and the collection is full, exactly
    /// [`capacity`](Self::capacity) intersections were found.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The intersections as a slice, in discovery order.
    #[inline]
    pub fn as_slice(&self) -> &[Intersection] {
        &self.found
    }

    /// Iterate over the intersections.
    pub fn iter(&self) -> impl Iterator<Item = &Intersection> + '_ {
        self.found.iter()
    }

    fn swapped(mut self) -> Intersections {
        for found in &mut self.found {
            core::mem::swap(&mut found.t1, &mut found.t2);
        }
        self
    }
}

impl IntoIterator for Intersections {
    type Item = Intersection;
    type IntoIter = arrayvec::IntoIter<Intersection, MAX_INTERSECTIONS>;

    fn into_iter(self) -> Self::IntoIter {
        self.found.into_iter()
    }
}

impl<'a> IntoIterator for &'a Intersections {
    type Item = &'a Intersection;
    type IntoIter = core::slice::Iter<'a, Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.found.iter()
    }
}

/// Find the intersections of two segments, with the default tolerances.
///
/// At most `capacity` intersections are returned. See
/// [`intersect_with_config`] for details.
pub fn intersect(seg1: &PathSeg, seg2: &PathSeg, capacity: usize) -> Intersections {
    intersect_with_config(seg1, seg2, capacity, &IntersectionConfig::default())
}

/// Find the intersections of two segments.
///
/// Pairs of lines, and a line paired with a cubic in either order, are
/// solved in closed form. Two cubics are bisected by de Casteljau
/// subdivision, and any pairing with a conic is bisected by restricting the
/// parameter range of the unmodified segments.
///
/// Parallel and collinear lines have no intersections, even when they
/// overlap. Non-finite segments have no intersections.
pub fn intersect_with_config(
    seg1: &PathSeg,
    seg2: &PathSeg,
    capacity: usize,
    config: &IntersectionConfig,
) -> Intersections {
    let bound = match (seg1, seg2) {
        (PathSeg::Line(_), PathSeg::Line(_)) => 1,
        (PathSeg::Line(_), PathSeg::Cubic(_)) | (PathSeg::Cubic(_), PathSeg::Line(_)) => 3,
        (PathSeg::Line(_), PathSeg::Conic(_)) | (PathSeg::Conic(_), PathSeg::Line(_)) => 2,
        (PathSeg::Conic(_), PathSeg::Conic(_)) => 4,
        (PathSeg::Cubic(_), PathSeg::Conic(_)) | (PathSeg::Conic(_), PathSeg::Cubic(_)) => 6,
        (PathSeg::Cubic(_), PathSeg::Cubic(_)) => MAX_INTERSECTIONS,
    };
    let mut out = Intersections::with_capacity(capacity.min(bound));
    if out.capacity == 0 || !seg1.is_finite() || !seg2.is_finite() {
        return out;
    }
    let out = match (*seg1, *seg2) {
        (PathSeg::Line(l1), PathSeg::Line(l2)) => {
            line_line(&l1, &l2, &mut out, config);
            out
        }
        (PathSeg::Line(l), PathSeg::Cubic(c)) => {
            line_cubic(&l, &c, &mut out, config);
            out
        }
        (PathSeg::Cubic(c), PathSeg::Line(l)) => {
            line_cubic(&l, &c, &mut out, config);
            out.swapped()
        }
        (PathSeg::Cubic(c1), PathSeg::Cubic(c2)) => {
            bisect(c1, c2, &mut out, config);
            out
        }
        (s1, s2) => {
            bisect(s1, s2, &mut out, config);
            out
        }
    };
    trace!(
        "intersect {:?} x {:?}: {} found{}",
        seg1,
        seg2,
        out.len(),
        if out.truncated { ", truncated" } else { "" }
    );
    out
}

impl PathSeg {
    /// Find the intersections of this segment with another.
    ///
    /// This is [`intersect`] with `self` as the first segment.
    pub fn intersections(&self, other: &PathSeg, capacity: usize) -> Intersections {
        intersect(self, other, capacity)
    }
}

/// Solve `l1.p0 + t d1 = l2.p0 + s d2` by Cramer's rule.
fn line_line(l1: &Line, l2: &Line, out: &mut Intersections, config: &IntersectionConfig) {
    let d1 = l1.direction();
    let d2 = l2.direction();
    let det = d1.cross(d2);
    if det == 0.0 {
        return;
    }
    let r = l2.p0 - l1.p0;
    let t = r.cross(d2) / det;
    let s = r.cross(d1) / det;
    if in_unit_range(t) && in_unit_range(s) {
        out.push_distinct(
            Intersection {
                t1: t,
                t2: s,
                point: l1.eval(t),
            },
            config.proximity,
        );
    }
}

/// Intersect a line with a cubic by moving the line onto the x axis and
/// solving for the zeros of the transformed cubic's y coordinate.
fn line_cubic(
    line: &Line,
    cubic: &CubicBez,
    out: &mut Intersections,
    config: &IntersectionConfig,
) {
    let d = line.direction();
    let len2 = d.hypot2();
    if len2 == 0.0 {
        return;
    }
    let align = Affine::translate(-line.p0.to_vec2()).then_rotate(-d.atan2());
    let aligned = align * *cubic;
    let roots = solve_cubic_bernstein(aligned.p0.y, aligned.p1.y, aligned.p2.y, aligned.p3.y);
    for t in roots {
        let point = cubic.eval(t);
        let s = (point - line.p0).dot(d) / len2;
        // The crossing lies on the line's extension.
        if !in_unit_range(s) {
            continue;
        }
        let candidate = Intersection {
            t1: s,
            t2: t,
            point,
        };
        out.push_distinct(candidate, config.proximity);
    }
}

/// A curve that the bisection search can restrict to a parameter range.
trait Bisect: Copy {
    /// Bounding box of the curve over `range` of the original parameter.
    fn bounds(&self, range: &Range<f64>) -> Rect;

    /// The two halves of the curve, split at the middle of `range`.
    fn halves(&self, range: &Range<f64>) -> (Self, Self);

    /// The original curve evaluated at the middle of `range`.
    fn midpoint(&self, range: &Range<f64>) -> Point;
}

/// Cubics carry the de Casteljau piece covering the current range.
impl Bisect for CubicBez {
    fn bounds(&self, _range: &Range<f64>) -> Rect {
        self.bounding_box()
    }

    fn halves(&self, _range: &Range<f64>) -> (Self, Self) {
        self.subdivide()
    }

    fn midpoint(&self, _range: &Range<f64>) -> Point {
        self.eval(0.5)
    }
}

/// Conic subdivision does not preserve the parametrization, so every
/// bound is taken from a subsegment of the unmodified segment.
impl Bisect for PathSeg {
    fn bounds(&self, range: &Range<f64>) -> Rect {
        self.subsegment(range.clone()).bounding_box()
    }

    fn halves(&self, _range: &Range<f64>) -> (Self, Self) {
        (*self, *self)
    }

    fn midpoint(&self, range: &Range<f64>) -> Point {
        self.eval(0.5 * (range.start + range.end))
    }
}

fn split(range: &Range<f64>) -> (Range<f64>, Range<f64>) {
    let mid = 0.5 * (range.start + range.end);
    (range.start..mid, mid..range.end)
}

fn bisect<A: Bisect, B: Bisect>(
    curve1: A,
    curve2: B,
    out: &mut Intersections,
    config: &IntersectionConfig,
) {
    let mut stack = Vec::new();
    stack.push((curve1, 0.0..1.0, curve2, 0.0..1.0));
    while let Some((c1, r1, c2, r2)) = stack.pop() {
        let b1 = c1.bounds(&r1);
        let b2 = c2.bounds(&r2);
        if !b1.overlaps(b2) {
            continue;
        }
        let size = config.converge_size;
        let small = |b: Rect| b.width() < size && b.height() < size;
        if small(b1) && small(b2) {
            let candidate = Intersection {
                t1: 0.5 * (r1.start + r1.end),
                t2: 0.5 * (r2.start + r2.end),
                point: c1.midpoint(&r1),
            };
            if !out.push_distinct(candidate, config.proximity) {
                if !stack.is_empty() {
                    out.truncated = true;
                }
                return;
            }
            continue;
        }
        let (c1l, c1r) = c1.halves(&r1);
        let (c2l, c2r) = c2.halves(&r2);
        let (r1l, r1r) = split(&r1);
        let (r2l, r2r) = split(&r2);
        // Reversed, so that (left, left) is popped first.
        stack.push((c1r, r1r.clone(), c2r, r2r.clone()));
        stack.push((c1r, r1r, c2l, r2l.clone()));
        stack.push((c1l, r1l.clone(), c2r, r2r));
        stack.push((c1l, r1l, c2l, r2l));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConicBez;
    use core::f64::consts::FRAC_1_SQRT_2;

    fn line(p0: (f64, f64), p1: (f64, f64)) -> PathSeg {
        PathSeg::Line(Line::new(p0, p1))
    }

    fn arch() -> PathSeg {
        PathSeg::Cubic(CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)))
    }

    fn assert_distinct(found: &Intersections) {
        for (i, a) in found.iter().enumerate() {
            for b in &found.as_slice()[i + 1..] {
                assert!(
                    a.point.distance(b.point) >= 0.1,
                    "{a:?} and {b:?} are too close"
                );
            }
        }
    }

    #[test]
    fn crossing_lines() {
        let found = intersect(&line((0.0, 0.0), (10.0, 0.0)), &line((5.0, -5.0), (5.0, 5.0)), 1);
        assert_eq!(found.len(), 1);
        let hit = found.as_slice()[0];
        assert!((hit.t1 - 0.5).abs() < 1e-12);
        assert!((hit.t2 - 0.5).abs() < 1e-12);
        assert!(hit.point.distance(Point::new(5.0, 0.0)) < 1e-12);
    }

    #[test]
    fn line_point_on_both() {
        let l1 = line((1.0, 2.0), (7.0, -3.0));
        let l2 = line((0.0, -4.0), (6.0, 5.0));
        let found = intersect(&l1, &l2, 9);
        assert_eq!(found.len(), 1);
        assert_eq!(found.capacity(), 1);
        let hit = found.as_slice()[0];
        assert!(l1.eval(hit.t1).distance(l2.eval(hit.t2)) < 1e-9);
    }

    #[test]
    fn parallel_and_collinear_lines() {
        let l1 = line((0.0, 0.0), (10.0, 0.0));
        assert!(intersect(&l1, &line((0.0, 1.0), (10.0, 1.0)), 1).is_empty());
        assert!(intersect(&l1, &line((5.0, 0.0), (15.0, 0.0)), 1).is_empty());
    }

    #[test]
    fn lines_missing_within_segment() {
        let l1 = line((0.0, 0.0), (1.0, 0.0));
        let l2 = line((5.0, -1.0), (5.0, 1.0));
        assert!(intersect(&l1, &l2, 1).is_empty());
    }

    #[test]
    fn line_crosses_arch_twice() {
        let l = line((-1.0, 0.5), (2.0, 0.5));
        let c = arch();
        let found = intersect(&l, &c, 3);
        assert_eq!(found.len(), 2);
        assert!(!found.is_truncated());
        let mut ts: Vec<f64> = found.iter().map(|i| i.t2).collect();
        ts.sort_by(f64::total_cmp);
        let r = 3.0f64.sqrt() / 6.0;
        assert!((ts[0] - (0.5 - r)).abs() < 1e-9);
        assert!((ts[1] - (0.5 + r)).abs() < 1e-9);
        for hit in &found {
            assert!(l.eval(hit.t1).distance(hit.point) < 1e-9);
            assert!(c.eval(hit.t2).distance(hit.point) < 1e-9);
        }

        let reversed = intersect(&c, &l, 3);
        assert_eq!(reversed.len(), 2);
        for (a, b) in found.iter().zip(reversed.iter()) {
            assert_eq!(a.t1, b.t2);
            assert_eq!(a.t2, b.t1);
        }
    }

    #[test]
    fn tangent_line_touches_once() {
        let found = intersect(&line((-1.0, 0.75), (2.0, 0.75)), &arch(), 3);
        assert_eq!(found.len(), 1);
        assert!((found.as_slice()[0].t2 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn line_cubic_capacity() {
        let found = intersect(&line((-1.0, 0.5), (2.0, 0.5)), &arch(), 1);
        assert_eq!(found.len(), 1);
        assert!(found.is_truncated());
    }

    #[test]
    fn line_cubic_extension_and_degenerate() {
        // Only the extension of this short line reaches the arch.
        assert!(intersect(&line((-1.0, 0.5), (-0.5, 0.5)), &arch(), 3).is_empty());
        assert!(intersect(&line((0.5, 0.5), (0.5, 0.5)), &arch(), 3).is_empty());
    }

    #[test]
    fn cubics_cross_twice() {
        let c1 = arch();
        let c2 = PathSeg::Cubic(CubicBez::new(
            (0.0, 0.5),
            (0.0, -0.5),
            (1.0, -0.5),
            (1.0, 0.5),
        ));
        // Both curves share x(t), and cross where 6t(1 - t) = 0.5.
        let r = (1.0f64 - 1.0 / 3.0).sqrt() / 2.0;
        let expected = [c1.eval(0.5 - r), c1.eval(0.5 + r)];
        let found = intersect(&c1, &c2, 9);
        assert!(found.len() >= 2 && found.len() <= 9);
        assert_distinct(&found);
        for p in expected {
            assert!(found.iter().any(|hit| hit.point.distance(p) < 0.3));
        }
        for hit in &found {
            assert!(expected.iter().any(|p| hit.point.distance(*p) < 0.3));
            assert!(c1.eval(hit.t1).distance(hit.point) < 1e-9);
        }
    }

    #[test]
    fn bisection_capacity() {
        let c2 = PathSeg::Cubic(CubicBez::new(
            (0.0, 0.5),
            (0.0, -0.5),
            (1.0, -0.5),
            (1.0, 0.5),
        ));
        let found = intersect(&arch(), &c2, 1);
        assert_eq!(found.len(), 1);
        assert!(found.is_truncated());
    }

    #[test]
    fn finer_convergence() {
        let c2 = PathSeg::Cubic(CubicBez::new(
            (0.0, 0.5),
            (0.0, -0.5),
            (1.0, -0.5),
            (1.0, 0.5),
        ));
        let config = IntersectionConfig {
            proximity: 0.01,
            converge_size: 1e-3,
        };
        let t = 0.5 - (1.0f64 - 1.0 / 3.0).sqrt() / 2.0;
        let found = intersect_with_config(&arch(), &c2, 9, &config);
        assert!(found.iter().any(|hit| (hit.t1 - t).abs() < 0.01));
    }

    #[test]
    fn conic_and_line() {
        let quarter = PathSeg::Conic(ConicBez::new(
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            FRAC_1_SQRT_2,
        ));
        let diagonal = line((0.0, 0.0), (1.0, 1.0));
        let expected = Point::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2);
        let found = intersect(&quarter, &diagonal, 2);
        assert!(!found.is_empty());
        assert_distinct(&found);
        for hit in &found {
            assert!(hit.point.distance(expected) < 0.3);
            assert!((hit.t1 - 0.5).abs() < 0.2);
            assert!((hit.t2 - FRAC_1_SQRT_2).abs() < 0.25);
        }
    }

    #[test]
    fn two_circle_arcs() {
        let unit = PathSeg::Conic(ConicBez::new(
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            FRAC_1_SQRT_2,
        ));
        // Quarter of the unit circle centered at (1, 0).
        let shifted = PathSeg::Conic(ConicBez::new(
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            FRAC_1_SQRT_2,
        ));
        let expected = Point::new(0.5, 0.75f64.sqrt());
        let found = unit.intersections(&shifted, 4);
        assert!(!found.is_empty());
        assert_distinct(&found);
        for hit in &found {
            assert!(hit.point.distance(expected) < 0.3);
        }
    }

    #[test]
    fn disjoint_curves() {
        let far = PathSeg::Cubic(CubicBez::new(
            (10.0, 10.0),
            (10.0, 11.0),
            (11.0, 11.0),
            (11.0, 10.0),
        ));
        assert!(intersect(&arch(), &far, 9).is_empty());
        assert!(intersect(&arch(), &line((0.0, 0.0), (1.0, 0.0)), 0).is_empty());
    }

    #[test]
    fn non_finite_segments() {
        let bad = line((f64::NAN, 0.0), (1.0, 1.0));
        assert!(intersect(&bad, &arch(), 3).is_empty());
        let inf = PathSeg::Conic(ConicBez::new(
            (0.0, 0.0),
            (f64::INFINITY, 1.0),
            (1.0, 0.0),
            1.0,
        ));
        assert!(intersect(&inf, &arch(), 3).is_empty());
    }
}
