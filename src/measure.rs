// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length queries over whole paths.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use log::debug;

use crate::contour::{clamp_distance, tie_limit};
use crate::{BezPath, ContourMeasure, PathEl, Point, Vec2};

/// The tolerance used by [`PathMeasure::with_default_tolerance`].
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// An error which can be returned when creating a [`PathMeasure`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureError {
    /// The tolerance was not a positive number.
    InvalidTolerance(f64),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureError::InvalidTolerance(tolerance) => {
                write!(f, "Tolerance must be positive, got {tolerance}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MeasureError {}

/// A position on a path, with its direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointAt {
    /// The point.
    pub point: Point,
    /// The unit tangent. Zero where the path has no extent.
    pub tangent: Vec2,
}

/// The result of [`PathMeasure::closest_point`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestPoint {
    /// Distance between the query point and [`point`](Self::point).
    pub distance: f64,
    /// The closest point on the path.
    pub point: Point,
    /// Distance along the path to the closest point.
    pub offset: f64,
    /// The unit tangent at the closest point.
    pub tangent: Vec2,
}

/// A path prepared for arc-length queries.
///
/// Every contour is measured when the `PathMeasure` is created; queries never
/// modify it. The path itself is shared, so cloning a measure is cheap
/// enough and never copies the path.
///
/// Distances are measured along the path from the start of its first
/// contour, with the contours laid end to end.
///
/// ```
/// use bezmeasure::{BezPath, PathMeasure, Point};
///
/// let mut path = BezPath::new();
/// path.move_to((0.0, 0.0));
/// path.line_to((100.0, 0.0));
/// path.line_to((100.0, 50.0));
///
/// let measure = PathMeasure::with_default_tolerance(path);
/// assert_eq!(measure.length(), 150.0);
/// assert_eq!(measure.point_at(125.0).point, Point::new(100.0, 25.0));
///
/// let mut half = BezPath::new();
/// measure.add_segment(&mut half, 0.0, 75.0);
/// assert_eq!(half.elements().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct PathMeasure {
    path: Arc<BezPath>,
    tolerance: f64,
    contours: Vec<ContourMeasure>,
    length: f64,
}

impl PathMeasure {
    /// Measure `path`, keeping positions within `tolerance` of the curves.
    ///
    /// Smaller tolerances cost more time and memory at construction.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidTolerance`] if `tolerance` is not a
    /// positive number.
    pub fn new(path: impl Into<Arc<BezPath>>, tolerance: f64) -> Result<PathMeasure, MeasureError> {
        // NaN fails this comparison too.
        if !(tolerance > 0.0) {
            return Err(MeasureError::InvalidTolerance(tolerance));
        }
        Ok(PathMeasure::build(path.into(), tolerance))
    }

    /// Measure `path` with [`DEFAULT_TOLERANCE`].
    pub fn with_default_tolerance(path: impl Into<Arc<BezPath>>) -> PathMeasure {
        PathMeasure::build(path.into(), DEFAULT_TOLERANCE)
    }

    fn build(path: Arc<BezPath>, tolerance: f64) -> PathMeasure {
        let contours: Vec<_> = path
            .contours()
            .map(|contour| ContourMeasure::new(contour, tolerance))
            .collect();
        // Summed in the same order as the offsets in the queries, so the
        // last contour ends exactly at `length`.
        let length = contours.iter().fold(0.0, |acc, c| acc + c.length());
        debug!(
            "measured {} contours, length {length}, tolerance {tolerance}",
            contours.len()
        );
        PathMeasure {
            path,
            tolerance,
            contours,
            length,
        }
    }

    /// The measured path.
    #[inline]
    pub fn path(&self) -> &Arc<BezPath> {
        &self.path
    }

    /// The tolerance the path was measured with.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The total length of all contours.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The number of contours, including empty ones.
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// The per-contour measures, in path order.
    #[inline]
    pub fn contours(&self) -> &[ContourMeasure] {
        &self.contours
    }

    /// The point and tangent `distance` along the path.
    ///
    /// The distance is clamped to `0..=length`, with NaN mapping to 0. Where
    /// contours meet, the distance belongs to the earlier contour's end;
    /// within a contour, a corner reports the outgoing tangent. An empty
    /// path reports the origin.
    pub fn point_at(&self, distance: f64) -> PointAt {
        let distance = clamp_distance(distance, self.length);
        let mut offset = 0.0;
        for contour in &self.contours {
            let end = offset + contour.length();
            if end < distance {
                offset = end;
            } else {
                let (point, tangent) = contour.point_at(distance - offset);
                return PointAt { point, tangent };
            }
        }
        PointAt {
            point: Point::ZERO,
            tangent: Vec2::ZERO,
        }
    }

    /// The point on the path closest to `point`, if one lies within
    /// `threshold`.
    ///
    /// Pass `f64::INFINITY` to accept any distance; then a point is found
    /// for every path with at least one drawn segment. When several points
    /// are equally close, the one earliest along the path wins. Distances
    /// that agree to a relative `1e-9` count as equal.
    pub fn closest_point(&self, point: Point, threshold: f64) -> Option<ClosestPoint> {
        let mut limit = threshold;
        let mut best: Option<ClosestPoint> = None;
        for contour in self.contours.iter().rev() {
            if let Some(found) = contour.closest_point(point, limit) {
                // Earlier contours keep ties.
                limit = tie_limit(found.distance).min(threshold);
                best = Some(ClosestPoint {
                    distance: found.distance,
                    point: found.point,
                    offset: found.offset,
                    tangent: found.tangent,
                });
            } else if let Some(best) = &mut best {
                best.offset += contour.length();
            }
        }
        best
    }

    /// The offset and position of the point on the path closest to `point`.
    ///
    /// An empty path gives offset 0 at the origin.
    pub fn closest_offset(&self, point: Point) -> (f64, Point) {
        match self.closest_point(point, f64::INFINITY) {
            Some(found) => (found.offset, found.point),
            None => (0.0, Point::ZERO),
        }
    }

    /// Append the part of the path between `start` and `end` to `sink`.
    ///
    /// Both distances are clamped to `0..=length`; nothing is added unless
    /// `start < end` afterwards. Contours covered completely are appended
    /// as they are, closed or not. Partially covered contours are appended
    /// as open subpaths.
    pub fn add_segment(&self, sink: &mut impl Extend<PathEl>, start: f64, end: f64) {
        let start = clamp_distance(start, self.length);
        let end = clamp_distance(end, self.length);
        if start >= end {
            return;
        }
        let mut offset = 0.0;
        for contour in &self.contours {
            let length = contour.length();
            let contour_end = offset + length;
            // A contour that `start` only touches at its end adds nothing.
            if contour_end < start || (length > 0.0 && contour_end <= start) {
                offset = contour_end;
                continue;
            }
            if start > offset || end < contour_end {
                let elements =
                    contour.segment_elements(start - offset, end.min(contour_end) - offset);
                sink.extend(elements);
            } else {
                sink.extend(contour.contour().elements());
            }
            if end <= contour_end {
                break;
            }
            offset = contour_end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_1_SQRT_2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn square(origin: (f64, f64), size: f64) -> BezPath {
        let (x, y) = origin;
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + size, y));
        path.line_to((x + size, y + size));
        path.line_to((x, y + size));
        path.close_path();
        path
    }

    fn circle(path: &mut BezPath, center: Point, r: f64) {
        let (cx, cy) = (center.x, center.y);
        path.move_to((cx + r, cy));
        path.conic_to((cx + r, cy + r), (cx, cy + r), FRAC_1_SQRT_2);
        path.conic_to((cx - r, cy + r), (cx - r, cy), FRAC_1_SQRT_2);
        path.conic_to((cx - r, cy - r), (cx, cy - r), FRAC_1_SQRT_2);
        path.conic_to((cx + r, cy - r), (cx + r, cy), FRAC_1_SQRT_2);
        path.close_path();
    }

    fn random_point(rng: &mut StdRng) -> Point {
        Point::new(
            rng.random_range(-1000.0..1000.0),
            rng.random_range(-1000.0..1000.0),
        )
    }

    fn random_weight(rng: &mut StdRng) -> f64 {
        if rng.random_bool(0.5) {
            rng.random_range(0.01..100.0)
        } else {
            1.0 / rng.random_range(1.0..100.0)
        }
    }

    /// Where the next drawing element of `path` would start.
    fn current_point(path: &BezPath) -> Point {
        let (mut start, mut last) = (Point::ZERO, Point::ZERO);
        for el in path.iter() {
            match el {
                PathEl::MoveTo(p) => {
                    start = p;
                    last = p;
                }
                PathEl::ClosePath => last = start,
                _ => last = el.end().unwrap_or(last),
            }
        }
        last
    }

    fn next_point(rng: &mut StdRng, current: Point, relative: bool) -> Point {
        let p = random_point(rng);
        if relative {
            current + p.to_vec2()
        } else {
            p
        }
    }

    // Every contour gets its own `MoveTo`, so that appending one random
    // path to another keeps the contours apart.
    fn random_contour(rng: &mut StdRng, path: &mut BezPath) {
        let mut current = current_point(path);
        if rng.random_bool(0.5) {
            let relative = rng.random_bool(0.5);
            current = next_point(rng, current, relative);
        }
        path.move_to(current);
        for _ in 0..rng.random_range(1..20) {
            let relative = rng.random_bool(0.5);
            match rng.random_range(0..3) {
                0 => {
                    current = next_point(rng, current, relative);
                    path.line_to(current);
                }
                1 => {
                    let p1 = next_point(rng, current, relative);
                    let p2 = next_point(rng, current, relative);
                    let p3 = next_point(rng, current, relative);
                    path.curve_to(p1, p2, p3);
                    current = p3;
                }
                _ => {
                    let p1 = next_point(rng, current, relative);
                    let p2 = next_point(rng, current, relative);
                    path.conic_to(p1, p2, random_weight(rng));
                    current = p2;
                }
            }
        }
        if rng.random_bool(0.5) {
            path.close_path();
        }
    }

    fn random_path(rng: &mut StdRng, max_contours: usize) -> BezPath {
        let mut path = BezPath::new();
        for _ in 0..rng.random_range(1..10).min(max_contours) {
            match rng.random_range(0..4) {
                0 => {
                    let origin = random_point(rng);
                    let size = rng.random_range(1.0..1000.0);
                    path.extend(square((origin.x, origin.y), size));
                }
                1 => circle(&mut path, random_point(rng), rng.random_range(1.0..1000.0)),
                _ => random_contour(rng, &mut path),
            }
        }
        path
    }

    fn sub_length(measure: &PathMeasure, start: f64, end: f64) -> f64 {
        let mut sub = BezPath::new();
        measure.add_segment(&mut sub, start, end);
        PathMeasure::new(sub, measure.tolerance()).unwrap().length()
    }

    #[test]
    fn invalid_tolerance() {
        let path = square((0.0, 0.0), 10.0);
        for tolerance in [0.0, -1.0, f64::NAN] {
            let err = PathMeasure::new(path.clone(), tolerance).unwrap_err();
            assert!(matches!(err, MeasureError::InvalidTolerance(_)));
        }
        assert_eq!(
            MeasureError::InvalidTolerance(0.0).to_string(),
            "Tolerance must be positive, got 0"
        );
        assert!(PathMeasure::new(path, 1e-3).is_ok());
    }

    #[test]
    fn empty_path() {
        let measure = PathMeasure::with_default_tolerance(BezPath::new());
        assert_eq!(measure.length(), 0.0);
        assert_eq!(measure.contour_count(), 0);
        assert_eq!(measure.point_at(10.0).point, Point::ZERO);
        assert!(measure.closest_point(Point::new(1.0, 1.0), f64::INFINITY).is_none());
        assert_eq!(measure.closest_offset(Point::new(1.0, 1.0)), (0.0, Point::ZERO));
        let mut sink = BezPath::new();
        measure.add_segment(&mut sink, 0.0, 10.0);
        assert!(sink.elements().is_empty());
    }

    #[test]
    fn two_squares() {
        let mut path = square((0.0, 0.0), 10.0);
        path.extend(square((100.0, 0.0), 10.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();
        assert_eq!(measure.contour_count(), 2);
        assert_eq!(measure.length(), 80.0);
        assert_eq!(measure.point_at(0.0).point, Point::ZERO);
        assert_eq!(measure.point_at(f64::NAN).point, Point::ZERO);
        assert_eq!(measure.point_at(-5.0).point, Point::ZERO);
        // The boundary belongs to the end of the first contour.
        let at = measure.point_at(40.0);
        assert_eq!(at.point, Point::ZERO);
        assert_eq!(at.tangent, Vec2::new(0.0, -1.0));
        assert_eq!(measure.point_at(45.0).point, Point::new(105.0, 0.0));
        assert_eq!(measure.point_at(1000.0).point, Point::new(100.0, 0.0));
    }

    #[test]
    fn closest_point_offsets_across_contours() {
        let mut path = square((0.0, 0.0), 10.0);
        path.extend(square((100.0, 0.0), 10.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();

        let found = measure
            .closest_point(Point::new(105.0, -2.0), f64::INFINITY)
            .unwrap();
        assert!((found.distance - 2.0).abs() < 1e-9);
        assert!((found.offset - 45.0).abs() < 1e-9);
        assert!(found.point.distance(Point::new(105.0, 0.0)) < 1e-9);

        // The winner is the last contour scanned, so earlier lengths add up
        // to nothing.
        let found = measure
            .closest_point(Point::new(5.0, -2.0), f64::INFINITY)
            .unwrap();
        assert!((found.offset - 5.0).abs() < 1e-9);
        assert_eq!(found.tangent, Vec2::new(1.0, 0.0));

        assert!(measure.closest_point(Point::new(50.0, 50.0), 10.0).is_none());
        let (offset, point) = measure.closest_offset(Point::new(50.0, 5.0));
        assert!((offset - 15.0).abs() < 1e-9);
        assert!(point.distance(Point::new(10.0, 5.0)) < 1e-9);
    }

    #[test]
    fn closest_point_tie_prefers_earlier_contour() {
        let mut path = square((0.0, 0.0), 10.0);
        path.extend(square((0.0, 0.0), 10.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();
        let found = measure
            .closest_point(Point::new(5.0, -1.0), f64::INFINITY)
            .unwrap();
        assert!((found.offset - 5.0).abs() < 1e-9);
    }

    #[test]
    fn closest_point_at_crossing_prefers_earlier_pass() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 10.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();
        let found = measure.closest_point(Point::new(5.0, 5.0), 0.0).unwrap();
        assert_eq!(found.distance, 0.0);
        assert!((found.offset - 50.0f64.sqrt()).abs() < 1e-9, "{}", found.offset);
    }

    #[test]
    fn closest_point_zero_threshold() {
        let measure = PathMeasure::new(square((0.0, 0.0), 10.0), 0.5).unwrap();
        assert!(measure.closest_point(Point::new(10.0, 0.0), 0.0).is_some());
        assert!(measure.closest_point(Point::new(10.0, 5.0), 1e-6).is_some());
        assert!(measure.closest_point(Point::new(10.5, 0.5), 0.0).is_none());
    }

    #[test]
    fn closest_point_on_curves_is_exact() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((30.0, 60.0), (70.0, -60.0), (100.0, 0.0));
        path.conic_to((150.0, 50.0), (100.0, 100.0), 0.7);
        path.line_to((0.0, 100.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();
        let length = measure.length();
        for i in 0..=40 {
            let distance = length * f64::from(i) / 40.0;
            let point = measure.point_at(distance).point;
            let found = measure.closest_point(point, 1e-9).unwrap();
            assert!(found.distance < 1e-9, "{distance}: {}", found.distance);
            assert!(found.point.distance(point) < 1e-9);
            assert!((found.offset - distance).abs() < 1e-6, "{distance}: {}", found.offset);
        }
        let off = Point::new(50.0, 50.0);
        let (_, nearest) = measure.closest_offset(off);
        let exact = measure.closest_point(off, off.distance(nearest)).unwrap();
        assert!(exact.point.distance(nearest) < 1e-9);
    }

    #[test]
    fn whole_path_round_trips() {
        let mut path = square((0.0, 0.0), 10.0);
        circle(&mut path, Point::new(50.0, 50.0), 20.0);
        path.move_to((200.0, 0.0));
        path.curve_to((210.0, 30.0), (240.0, -30.0), (250.0, 0.0));
        path.move_to((300.0, 0.0));
        path.quad_to((320.0, 40.0), (340.0, 0.0));
        path.close_path();
        let measure = PathMeasure::new(path.clone(), 0.5).unwrap();
        let mut copy = BezPath::new();
        measure.add_segment(&mut copy, 0.0, measure.length());
        assert_eq!(copy, path);
        let mut copy = BezPath::new();
        measure.add_segment(&mut copy, -100.0, f64::INFINITY);
        assert_eq!(copy, path);
    }

    #[test]
    fn add_segment_partial() {
        let mut path = square((0.0, 0.0), 10.0);
        path.extend(square((100.0, 0.0), 10.0));
        let measure = PathMeasure::new(path, 0.5).unwrap();

        let mut sink = BezPath::new();
        measure.add_segment(&mut sink, 35.0, 45.0);
        assert_eq!(
            sink.elements(),
            [
                PathEl::MoveTo(Point::new(0.0, 5.0)),
                PathEl::LineTo(Point::new(0.0, 0.0)),
                PathEl::MoveTo(Point::new(100.0, 0.0)),
                PathEl::LineTo(Point::new(105.0, 0.0)),
            ]
        );

        // Ending exactly at a contour boundary adds nothing beyond it.
        let mut sink = BezPath::new();
        measure.add_segment(&mut sink, 0.0, 40.0);
        assert_eq!(sink, square((0.0, 0.0), 10.0));

        let mut sink = BezPath::new();
        measure.add_segment(&mut sink, 30.0, 10.0);
        assert!(sink.elements().is_empty());
    }

    #[test]
    fn shared_path() {
        let path = Arc::new(square((0.0, 0.0), 10.0));
        let measure = PathMeasure::new(path.clone(), 0.5).unwrap();
        let copy = measure.clone();
        assert!(Arc::ptr_eq(measure.path(), &path));
        assert!(Arc::ptr_eq(copy.path(), &path));
        drop(measure);
        assert_eq!(Arc::strong_count(&path), 2);
    }

    #[test]
    fn measure_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PathMeasure>();
    }

    #[test]
    fn curve_length() {
        let mut path = BezPath::new();
        circle(&mut path, Point::ZERO, 100.0);
        let measure = PathMeasure::new(path, 0.01).unwrap();
        let expected = 200.0 * core::f64::consts::PI;
        assert!((measure.length() - expected).abs() < 0.5);
        let at = measure.point_at(0.25 * measure.length());
        assert!(at.point.distance(Point::new(0.0, 100.0)) < 0.5);
        assert!((at.tangent - Vec2::new(-1.0, 0.0)).hypot() < 1e-2);
    }

    #[test]
    fn segment_start_and_end() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..10 {
            let measure = PathMeasure::new(random_path(&mut rng, usize::MAX), 0.1).unwrap();
            let length = measure.length();
            let epsilon = (length / 256.0).max(1.0);
            for i in 0..=20 {
                let seg_length = length * f64::from(i) / 20.0;
                let start = sub_length(&measure, 0.0, seg_length);
                assert!((start - seg_length).abs() <= epsilon, "{start} != {seg_length}");
                let end = sub_length(&measure, length - seg_length, length);
                assert!((end - seg_length).abs() <= epsilon, "{end} != {seg_length}");
            }
        }
    }

    #[test]
    fn segment_chunks() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..10 {
            let measure = PathMeasure::new(random_path(&mut rng, usize::MAX), 0.1).unwrap();
            let length = measure.length();
            let epsilon = (length / 256.0).max(1.0);
            for i in 0..=20 {
                let start = length * f64::from(i) / 40.0;
                let chunk = sub_length(&measure, start, start + length / 2.0);
                assert!((chunk - length / 2.0).abs() <= epsilon);
            }
        }
    }

    #[test]
    fn segment_splits() {
        let mut rng = StdRng::seed_from_u64(4242);
        for _ in 0..50 {
            let measure = PathMeasure::new(random_path(&mut rng, usize::MAX), 0.1).unwrap();
            let length = measure.length();
            if length == 0.0 {
                continue;
            }
            let epsilon = (length / 256.0).max(1.0);
            let split1 = rng.random_range(0.0..length);
            let split2 = rng.random_range(split1..=length);
            let l1 = sub_length(&measure, 0.0, split1);
            let l2 = sub_length(&measure, split1, split2);
            let l3 = sub_length(&measure, split2, length);
            assert!((l1 - split1).abs() <= epsilon);
            assert!((l2 - (split2 - split1)).abs() <= epsilon);
            assert!((l3 - (length - split2)).abs() <= epsilon);
        }
    }

    #[test]
    fn point_at_is_continuous_within_contours() {
        let max_contours = 5;
        let tolerance = 0.5;
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            let measure =
                PathMeasure::new(random_path(&mut rng, max_contours), tolerance).unwrap();
            let length = measure.length();
            let mut last_point = measure.point_at(0.0).point;
            let mut last_offset = 0.0;
            let mut discontinuities = 0;
            for j in 1..=1024 {
                let offset = length * f64::from(j) / 1024.0;
                let point = measure.point_at(offset).point;
                if last_point.distance(point) > offset - last_offset + tolerance {
                    discontinuities += 1;
                    assert!(discontinuities < max_contours);
                }
                last_offset = offset;
                last_point = point;
            }
        }
    }

    #[test]
    fn closest_point_of_concatenation() {
        let tolerance = 0.5;
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..10 {
            let path1 = random_path(&mut rng, usize::MAX);
            let path2 = random_path(&mut rng, usize::MAX);
            let measure1 = PathMeasure::new(path1.clone(), tolerance).unwrap();
            let measure2 = PathMeasure::new(path2.clone(), tolerance).unwrap();
            let mut path = path1;
            path.extend(path2);
            let measure = PathMeasure::new(path, tolerance).unwrap();
            for _ in 0..100 {
                let test = random_point(&mut rng);
                let found1 = measure1.closest_point(test, f64::INFINITY);
                let found2 = measure2.closest_point(test, f64::INFINITY);
                let found = measure.closest_point(test, f64::INFINITY);
                match (found1, found2) {
                    (Some(a), Some(b)) if a.distance > tie_limit(b.distance) => {
                        let c = found.unwrap();
                        assert_eq!(c.distance, b.distance);
                        assert_eq!(c.point, b.point);
                        assert!((c.offset - (b.offset + measure1.length())).abs() < 1e-6);
                    }
                    (Some(a), _) => assert_eq!(found, Some(a)),
                    (None, Some(b)) => {
                        let c = found.unwrap();
                        assert_eq!(c.point, b.point);
                        assert!((c.offset - (b.offset + measure1.length())).abs() < 1e-6);
                    }
                    (None, None) => assert!(found.is_none()),
                }
            }
        }
    }

    #[test]
    fn closest_point_for_point_on_path() {
        let tolerance = 0.5;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let measure = PathMeasure::new(random_path(&mut rng, usize::MAX), tolerance).unwrap();
            let length = measure.length();
            if length == 0.0 {
                continue;
            }
            for _ in 0..50 {
                let offset = rng.random_range(0.0..=length);
                let point = measure.point_at(offset).point;
                let found = measure.closest_point(point, tolerance).unwrap();
                assert!(found.distance <= tolerance);
                assert!(found.point.distance(point) <= tolerance);
                assert!(found.offset < offset + tolerance);
            }
        }
    }
}
