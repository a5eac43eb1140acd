// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length tables for single contours.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{Contour, Line, ParamCurve, PathEl, PathSeg, Point, Vec2};

/// Halvings of a segment's parameter range before a piece is accepted
/// regardless of flatness.
const MAX_FLATTEN_DEPTH: usize = 16;

/// Parameter steps below this move a closest point by a negligible amount.
const NEAREST_ACCURACY: f64 = 1e-12;

/// Relative slack under which two distances count as equal.
const TIE_EPSILON: f64 = 1e-9;

/// A chord of a contour segment, accurate to the measure's tolerance.
#[derive(Clone, Copy, Debug)]
struct Piece {
    seg: usize,
    t0: f64,
    t1: f64,
    p0: Point,
    p1: Point,
    /// Distance along the contour at `p0`.
    start: f64,
    /// Distance along the contour at `p1`.
    end: f64,
}

impl Piece {
    /// Parameter on the segment at `distance` along the contour.
    fn t_at(&self, distance: f64) -> f64 {
        let frac = ((distance - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        self.t0 + frac * (self.t1 - self.t0)
    }

    /// Distance along the contour at parameter `t` of the segment.
    fn distance_at(&self, t: f64) -> f64 {
        let frac = if self.t1 > self.t0 {
            ((t - self.t0) / (self.t1 - self.t0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.start + frac * (self.end - self.start)
    }
}

/// A point found on a contour by [`ContourMeasure::closest_point`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourPoint {
    /// Distance from the query point.
    pub distance: f64,
    /// The point on the contour.
    pub point: Point,
    /// Distance along the contour.
    pub offset: f64,
    /// Unit tangent at the point.
    pub tangent: Vec2,
}

/// The arc-length table of one contour.
///
/// Every segment is flattened into chords that stay within the tolerance of
/// the curve. Positions along the contour are looked up by chord length and
/// then evaluated exactly on the curve.
#[derive(Clone, Debug)]
pub struct ContourMeasure {
    contour: Contour,
    pieces: Vec<Piece>,
    length: f64,
    tolerance: f64,
}

impl ContourMeasure {
    /// Build the table for `contour`.
    ///
    /// `tolerance` must be positive.
    pub fn new(contour: Contour, tolerance: f64) -> ContourMeasure {
        let mut pieces = Vec::new();
        let mut length = 0.0;
        for (i, seg) in contour.segments().iter().enumerate() {
            flatten(seg, i, tolerance, &mut pieces, &mut length);
        }
        ContourMeasure {
            contour,
            pieces,
            length,
            tolerance,
        }
    }

    /// The measured contour.
    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// The length of the contour.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The point and unit tangent at `distance` along the contour.
    ///
    /// The distance is clamped to the contour, with NaN mapping to the
    /// start. At a corner the tangent describes the outgoing direction. A
    /// contour of zero length reports its start point and a zero tangent.
    pub fn point_at(&self, distance: f64) -> (Point, Vec2) {
        let distance = clamp_distance(distance, self.length);
        let Some(piece) = self.piece_from(distance) else {
            return (self.contour.start(), Vec2::ZERO);
        };
        let seg = &self.contour.segments()[piece.seg];
        let t = piece.t_at(distance);
        (seg.eval(t), tangent(seg, piece, t))
    }

    /// The point on the contour closest to `point`, if one is within
    /// `threshold`.
    ///
    /// Ties go to the point earliest along the contour. Distances that agree
    /// to a relative `1e-9` count as tied.
    pub fn closest_point(&self, point: Point, threshold: f64) -> Option<ContourPoint> {
        let mut limit = threshold;
        let mut best: Option<(Piece, f64, Point)> = None;
        for piece in &self.pieces {
            let chord = Line::new(piece.p0, piece.p1);
            if segment_distance(chord, point) - self.tolerance > limit {
                continue;
            }
            let seg = &self.contour.segments()[piece.seg];
            let near = seg.nearest_in_range(point, piece.t0..piece.t1, NEAREST_ACCURACY);
            let candidate = seg.eval(near.t);
            let d = candidate.distance(point);
            let better = if best.is_some() {
                tie_limit(d) < limit
            } else {
                d <= threshold
            };
            if better {
                limit = d;
                best = Some((*piece, near.t, candidate));
            }
        }
        best.map(|(piece, t, found)| ContourPoint {
            distance: limit,
            point: found,
            offset: piece.distance_at(t),
            tangent: tangent(&self.contour.segments()[piece.seg], &piece, t),
        })
    }

    /// The path elements covering `start..end` along the contour.
    ///
    /// The result begins with a `MoveTo` and never closes the path.
    pub fn segment_elements(&self, start: f64, end: f64) -> Vec<PathEl> {
        let start = clamp_distance(start, self.length);
        let end = clamp_distance(end, self.length).max(start);
        let (Some(first), Some(last)) = (self.piece_from(start), self.piece_until(end)) else {
            return alloc::vec![PathEl::MoveTo(self.contour.start())];
        };
        let segments = self.contour.segments();
        let t_start = first.t_at(start);
        let t_end = last.t_at(end);
        let mut result = alloc::vec![PathEl::MoveTo(segments[first.seg].eval(t_start))];
        if first.seg == last.seg {
            result.push(part(&segments[first.seg], t_start..t_end));
            return result;
        }
        if t_start < 1.0 {
            result.push(part(&segments[first.seg], t_start..1.0));
        }
        for seg in &segments[first.seg + 1..last.seg] {
            result.push(seg.as_path_el());
        }
        if t_end > 0.0 {
            result.push(part(&segments[last.seg], 0.0..t_end));
        }
        result
    }

    /// The last piece starting at or before `distance`.
    fn piece_from(&self, distance: f64) -> Option<&Piece> {
        let i = self.pieces.partition_point(|p| p.start <= distance);
        self.pieces.get(i.saturating_sub(1))
    }

    /// The first piece ending at or after `distance`.
    fn piece_until(&self, distance: f64) -> Option<&Piece> {
        let i = self.pieces.partition_point(|p| p.end < distance);
        self.pieces.get(i.min(self.pieces.len().saturating_sub(1)))
    }
}

/// The largest distance that still ties with `d`.
pub(crate) fn tie_limit(d: f64) -> f64 {
    d + TIE_EPSILON * d.max(1.0)
}

/// Clamp `distance` into `0..=length`, mapping NaN to 0.
pub(crate) fn clamp_distance(distance: f64, length: f64) -> f64 {
    if distance.is_nan() {
        0.0
    } else {
        distance.clamp(0.0, length)
    }
}

fn part(seg: &PathSeg, range: Range<f64>) -> PathEl {
    if range == (0.0..1.0) {
        seg.as_path_el()
    } else {
        seg.subsegment(range).as_path_el()
    }
}

fn flatten(
    seg: &PathSeg,
    index: usize,
    tolerance: f64,
    pieces: &mut Vec<Piece>,
    length: &mut f64,
) {
    if !seg.is_finite() {
        return;
    }
    let mut stack = alloc::vec![(0.0, 1.0, 0)];
    while let Some((t0, t1, depth)) = stack.pop() {
        let sub = seg.subsegment(t0..t1);
        if depth < MAX_FLATTEN_DEPTH && !is_flat(seg, &sub, t0..t1, tolerance) {
            let tm = 0.5 * (t0 + t1);
            stack.push((tm, t1, depth + 1));
            stack.push((t0, tm, depth + 1));
            continue;
        }
        let (p0, p1) = (sub.start(), sub.end());
        let chord = p0.distance(p1);
        if chord == 0.0 || !chord.is_finite() {
            continue;
        }
        pieces.push(Piece {
            seg: index,
            t0,
            t1,
            p0,
            p1,
            start: *length,
            end: *length + chord,
        });
        *length += chord;
    }
}

/// Whether the chord of `sub`, which covers `range` of `seg`, can stand in
/// for it.
///
/// The curve lies in the convex hull of its control points, so checking the
/// interior control points against the chord bounds the deviation. Distances
/// along the piece are interpolated linearly in the parameter, so the
/// parametrization must also stay close to the chord's.
fn is_flat(seg: &PathSeg, sub: &PathSeg, range: Range<f64>, tolerance: f64) -> bool {
    let (p0, p1) = (sub.start(), sub.end());
    let chord = Line::new(p0, p1);
    sub.inner_points()
        .iter()
        .all(|&p| segment_distance(chord, p) <= tolerance)
        && [0.25, 0.5, 0.75].iter().all(|&f| {
            let t = range.start + f * (range.end - range.start);
            seg.eval(t).distance(p0.lerp(p1, f)) <= tolerance
        })
}

/// Distance from `p` to the closest point of the segment `line`.
fn segment_distance(line: Line, p: Point) -> f64 {
    let d = line.direction();
    let len2 = d.hypot2();
    if len2 == 0.0 {
        return p.distance(line.p0);
    }
    let frac = ((p - line.p0).dot(d) / len2).clamp(0.0, 1.0);
    p.distance(line.eval(frac))
}

fn tangent(seg: &PathSeg, piece: &Piece, t: f64) -> Vec2 {
    let deriv = seg.tangent(t);
    if deriv.hypot2() > 0.0 && deriv.is_finite() {
        deriv.normalize()
    } else {
        (piece.p1 - piece.p0).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BezPath, ConicBez, CubicBez, ParamCurveArclen};
    use core::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

    fn measure(path: &BezPath, tolerance: f64) -> ContourMeasure {
        ContourMeasure::new(path.contours().next().unwrap(), tolerance)
    }

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn square_length_and_points() {
        let m = measure(&square(), 0.5);
        assert_eq!(m.length(), 40.0);
        let (p, t) = m.point_at(5.0);
        assert_eq!(p, Point::new(5.0, 0.0));
        assert_eq!(t, Vec2::new(1.0, 0.0));
        // The corner belongs to the outgoing side.
        let (p, t) = m.point_at(10.0);
        assert_eq!(p, Point::new(10.0, 0.0));
        assert_eq!(t, Vec2::new(0.0, 1.0));
        let (p, _) = m.point_at(35.0);
        assert_eq!(p, Point::new(0.0, 5.0));
        let (p, t) = m.point_at(40.0);
        assert_eq!(p, Point::ZERO);
        assert_eq!(t, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn circle_arc_length() {
        let mut path = BezPath::new();
        path.move_to((100.0, 0.0));
        path.conic_to((100.0, 100.0), (0.0, 100.0), FRAC_1_SQRT_2);
        let m = measure(&path, 0.01);
        let expected = 100.0 * FRAC_PI_2;
        assert!(m.length() <= expected);
        assert!(expected - m.length() < 0.1, "{}", m.length());
        let (p, t) = m.point_at(0.5 * m.length());
        assert!((p.to_vec2().hypot() - 100.0).abs() < 1e-9);
        assert!(p.distance(Point::new(100.0 * FRAC_1_SQRT_2, 100.0 * FRAC_1_SQRT_2)) < 0.5);
        assert!(t.dot(p.to_vec2()).abs() < 1e-6);
    }

    #[test]
    fn cubic_points_lie_on_curve() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        let mut path = BezPath::new();
        path.move_to(c.p0);
        path.curve_to(c.p1, c.p2, c.p3);
        let m = measure(&path, 0.1);
        for i in 0..=20 {
            let (p, t) = m.point_at(m.length() * f64::from(i) / 20.0);
            let found = m.closest_point(p, 1.0).unwrap();
            assert!(found.distance < 1e-9);
            assert!((found.tangent - t).hypot() < 1e-6);
        }
    }

    #[test]
    fn length_agrees_with_arclen() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((30.0, 60.0), (70.0, -60.0), (100.0, 0.0));
        path.conic_to((150.0, 50.0), (100.0, 100.0), 0.7);
        path.quad_to((50.0, 150.0), (0.0, 100.0));
        path.close_path();
        let contour = path.contours().next().unwrap();
        let arclen: f64 = contour.segments().iter().map(|seg| seg.arclen(1e-9)).sum();
        let m = ContourMeasure::new(contour, 0.1);
        // Chords never exceed the arcs they span.
        assert!(m.length() <= arclen + 1e-6);
        assert!(arclen - m.length() < 1e-2 * arclen, "{} vs {arclen}", m.length());
    }

    #[test]
    fn closest_point_on_square() {
        let m = measure(&square(), 0.5);
        let found = m.closest_point(Point::new(5.0, -3.0), f64::INFINITY).unwrap();
        assert!((found.distance - 3.0).abs() < 1e-9);
        assert!(found.point.distance(Point::new(5.0, 0.0)) < 1e-9);
        assert!((found.offset - 5.0).abs() < 1e-9);
        assert!(m.closest_point(Point::new(5.0, -3.0), 2.0).is_none());
        // Exactly on a vertex.
        let found = m.closest_point(Point::new(10.0, 10.0), 0.0).unwrap();
        assert_eq!(found.distance, 0.0);
        assert_eq!(found.offset, 20.0);
    }

    #[test]
    fn segment_elements_partial() {
        let m = measure(&square(), 0.5);
        assert_eq!(
            m.segment_elements(5.0, 15.0),
            [
                PathEl::MoveTo(Point::new(5.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 5.0)),
            ]
        );
        assert_eq!(
            m.segment_elements(10.0, 20.0),
            [
                PathEl::MoveTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn segment_elements_of_conic() {
        let conic = ConicBez::new((100.0, 0.0), (100.0, 100.0), (0.0, 100.0), FRAC_1_SQRT_2);
        let mut path = BezPath::new();
        path.move_to(conic.p0);
        path.conic_to(conic.p1, conic.p2, conic.weight);
        let m = measure(&path, 0.01);
        let els = m.segment_elements(10.0, m.length() - 10.0);
        assert_eq!(els.len(), 2);
        let PathEl::ConicTo(_, end, _) = els[1] else {
            panic!("expected a conic, got {:?}", els[1]);
        };
        assert!(end.distance(m.point_at(m.length() - 10.0).0) < 1e-9);
    }

    #[test]
    fn empty_contour() {
        let mut path = BezPath::new();
        path.move_to((3.0, 4.0));
        let m = measure(&path, 0.5);
        assert_eq!(m.length(), 0.0);
        assert_eq!(m.point_at(1.0), (Point::new(3.0, 4.0), Vec2::ZERO));
        assert!(m.closest_point(Point::ZERO, f64::INFINITY).is_none());
    }

    #[test]
    fn non_finite_segments_are_skipped() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.curve_to((f64::NAN, 0.0), (20.0, 0.0), (30.0, 0.0));
        let m = measure(&path, 0.5);
        assert_eq!(m.length(), 10.0);
    }
}
