// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths with lines, cubics and conics.

use alloc::vec::Vec;
use core::iter::{Extend, FromIterator};
use core::mem;
use core::ops::{Mul, Range};

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use crate::param_curve::nearest_in_range;
use crate::{
    Affine, ConicBez, CubicBez, Line, Nearest, ParamCurve, ParamCurveArclen, ParamCurveDeriv,
    ParamCurveExtrema, ParamCurveNearest, Point, QuadBez, Rect, Vec2, MAX_EXTREMA,
};

/// A Bézier path.
///
/// Conceptually, a `BezPath` contains zero or more contours (subpaths).
/// A contour begins with a `MoveTo`, then has zero or more drawing elements
/// (`LineTo`, `QuadTo`, `CurveTo`, `ConicTo`), and optionally ends with a
/// `ClosePath`.
///
/// Internally, a `BezPath` is a list of [`PathEl`]s; as such it implements
/// [`FromIterator<PathEl>`] and [`Extend<PathEl>`]. The latter makes it a
/// natural sink for [`PathMeasure::add_segment`].
///
/// The elements can be iterated with [`iter`], the curve segments with
/// [`segments`] and the contours with [`contours`].
///
/// [`iter`]: BezPath::iter
/// [`segments`]: BezPath::segments
/// [`contours`]: BezPath::contours
/// [`PathMeasure::add_segment`]: crate::PathMeasure::add_segment
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each contour.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// contour.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic Bézier using the current location and the two points.
    ///
    /// Quadratics are raised to an equivalent cubic when segments are formed.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Draw a conic using the current location, a control point, an end
    /// point and the control point's weight.
    ConicTo(Point, Point, f64),
    /// Close off the path.
    ClosePath,
}

/// A segment of a Bézier path.
///
/// This is the closed set of curve kinds that the intersection and
/// measuring code understands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
    /// A conic segment.
    Conic(ConicBez),
}

impl BezPath {
    /// Create a new path.
    #[inline]
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    ///
    /// `BezPath` also implements `FromIterator<PathEl>`, so it works with `collect`.
    #[inline]
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    #[inline]
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "conic to" element onto the path.
    pub fn conic_to<P: Into<Point>>(&mut self, p1: P, p2: P, weight: f64) {
        self.push(PathEl::ConicTo(p1.into(), p2.into(), weight));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns an iterator over the path's elements.
    pub fn iter(&self) -> impl Iterator<Item = PathEl> + '_ {
        self.0.iter().copied()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> Segments<impl Iterator<Item = PathEl> + '_> {
        segments(self.iter())
    }

    /// Iterate over the contours of the path.
    pub fn contours(&self) -> Contours<'_> {
        Contours {
            elements: self.0.iter(),
            last: Point::ZERO,
            pending: None,
        }
    }

    /// Returns `true` if the path contains no drawing elements.
    pub fn is_empty(&self) -> bool {
        self.0
            .iter()
            .all(|el| matches!(el, PathEl::MoveTo(..) | PathEl::ClosePath))
    }

    /// Apply an affine transform to the path.
    pub fn apply_affine(&mut self, affine: Affine) {
        for el in self.0.iter_mut() {
            *el = affine * (*el);
        }
    }

    /// Is this path finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        let el_vec: Vec<_> = iter.into_iter().collect();
        BezPath::from_vec(el_vec)
    }
}

/// Allow iteration over references to `BezPath`.
///
/// Note: the semantics are slightly different from simply iterating over the
/// slice, as it returns `PathEl` items, rather than references.
impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().copied()
    }
}

impl IntoIterator for BezPath {
    type Item = PathEl;
    type IntoIter = alloc::vec::IntoIter<PathEl>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl Mul<PathEl> for Affine {
    type Output = PathEl;

    fn mul(self, other: PathEl) -> PathEl {
        match other {
            PathEl::MoveTo(p) => PathEl::MoveTo(self * p),
            PathEl::LineTo(p) => PathEl::LineTo(self * p),
            PathEl::QuadTo(p1, p2) => PathEl::QuadTo(self * p1, self * p2),
            PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(self * p1, self * p2, self * p3),
            PathEl::ConicTo(p1, p2, w) => PathEl::ConicTo(self * p1, self * p2, w),
            PathEl::ClosePath => PathEl::ClosePath,
        }
    }
}

impl Mul<BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, other: BezPath) -> BezPath {
        BezPath(other.0.iter().map(|&el| self * el).collect())
    }
}

impl Mul<&BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, other: &BezPath) -> BezPath {
        BezPath(other.0.iter().map(|&el| self * el).collect())
    }
}

impl Mul<PathSeg> for Affine {
    type Output = PathSeg;

    fn mul(self, other: PathSeg) -> PathSeg {
        match other {
            PathSeg::Line(line) => PathSeg::Line(self * line),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(self * cubic),
            PathSeg::Conic(conic) => PathSeg::Conic(self * conic),
        }
    }
}

/// Transform an iterator over path elements into one over path
/// segments.
///
/// See also [`BezPath::segments`].
pub fn segments<I>(elements: I) -> Segments<I::IntoIter>
where
    I: IntoIterator<Item = PathEl>,
{
    Segments {
        elements: elements.into_iter(),
        start_last: None,
    }
}

/// An iterator that transforms path elements to path segments.
///
/// This struct is created by the [`segments`] function.
#[derive(Clone, Debug)]
pub struct Segments<I: Iterator<Item = PathEl>> {
    elements: I,
    start_last: Option<(Point, Point)>,
}

impl<I: Iterator<Item = PathEl>> Iterator for Segments<I> {
    type Item = PathSeg;

    fn next(&mut self) -> Option<PathSeg> {
        for el in &mut self.elements {
            // A path that does not begin with a `MoveTo` starts at the origin.
            let (start, last) = self.start_last.get_or_insert((Point::ZERO, Point::ZERO));

            return Some(match el {
                PathEl::MoveTo(p) => {
                    *start = p;
                    *last = p;
                    continue;
                }
                PathEl::LineTo(p) => PathSeg::Line(Line::new(mem::replace(last, p), p)),
                PathEl::QuadTo(p1, p2) => {
                    PathSeg::Cubic(QuadBez::new(mem::replace(last, p2), p1, p2).raise())
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    PathSeg::Cubic(CubicBez::new(mem::replace(last, p3), p1, p2, p3))
                }
                PathEl::ConicTo(p1, p2, w) => {
                    PathSeg::Conic(ConicBez::new(mem::replace(last, p2), p1, p2, w))
                }
                PathEl::ClosePath => {
                    if *last != *start {
                        PathSeg::Line(Line::new(mem::replace(last, *start), *start))
                    } else {
                        continue;
                    }
                }
            });
        }

        None
    }
}

/// One contour (subpath) of a [`BezPath`], resolved into segments.
///
/// A closed contour whose last drawn point differs from its start carries
/// the closing line as its final segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    start: Point,
    segments: SmallVec<[PathSeg; 4]>,
    /// The drawing elements the contour was built from, one per drawn
    /// segment.
    drawn: SmallVec<[PathEl; 4]>,
    closed: bool,
}

impl Contour {
    fn new(start: Point) -> Contour {
        Contour {
            start,
            segments: SmallVec::new(),
            drawn: SmallVec::new(),
            closed: false,
        }
    }

    /// The point the contour starts at.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The segments of the contour, including the closing line if any.
    #[inline]
    pub fn segments(&self) -> &[PathSeg] {
        &self.segments
    }

    /// Whether the contour ends with a `ClosePath`.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The path elements this contour was built from, starting with a
    /// `MoveTo` and ending with a `ClosePath` for closed contours.
    ///
    /// Quadratic elements are reported as they were given, even though their
    /// segments are cubics.
    pub fn elements(&self) -> impl Iterator<Item = PathEl> + '_ {
        core::iter::once(PathEl::MoveTo(self.start))
            .chain(self.drawn.iter().copied())
            .chain(self.closed.then_some(PathEl::ClosePath))
    }

    fn push(&mut self, el: PathEl, segment: PathSeg) {
        self.drawn.push(el);
        self.segments.push(segment);
    }

    fn close(&mut self, last: Point) {
        if last != self.start {
            self.segments
                .push(PathSeg::Line(Line::new(last, self.start)));
        }
        self.closed = true;
    }
}

/// An iterator over the contours of a path.
///
/// This struct is created by [`BezPath::contours`]. Every `MoveTo` starts a
/// contour, even one that draws nothing. A drawing element following a
/// `ClosePath` starts a new contour at the start point of the closed one.
#[derive(Clone, Debug)]
pub struct Contours<'a> {
    elements: core::slice::Iter<'a, PathEl>,
    last: Point,
    pending: Option<Contour>,
}

impl Iterator for Contours<'_> {
    type Item = Contour;

    fn next(&mut self) -> Option<Contour> {
        for &el in &mut self.elements {
            let segment = match el {
                PathEl::MoveTo(p) => {
                    self.last = p;
                    if let Some(done) = self.pending.replace(Contour::new(p)) {
                        return Some(done);
                    }
                    continue;
                }
                PathEl::ClosePath => {
                    if let Some(mut done) = self.pending.take() {
                        done.close(self.last);
                        self.last = done.start;
                        return Some(done);
                    }
                    continue;
                }
                PathEl::LineTo(p) => PathSeg::Line(Line::new(self.last, p)),
                PathEl::QuadTo(p1, p2) => PathSeg::Cubic(QuadBez::new(self.last, p1, p2).raise()),
                PathEl::CurveTo(p1, p2, p3) => {
                    PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3))
                }
                PathEl::ConicTo(p1, p2, w) => PathSeg::Conic(ConicBez::new(self.last, p1, p2, w)),
            };
            let last = self.last;
            self.last = segment.end();
            self.pending
                .get_or_insert_with(|| Contour::new(last))
                .push(el, segment);
        }
        self.pending.take()
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
            PathSeg::Conic(conic) => conic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
            PathSeg::Conic(conic) => PathSeg::Conic(conic.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
            PathSeg::Conic(conic) => conic.p0,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Cubic(cubic) => cubic.p3,
            PathSeg::Conic(conic) => conic.p2,
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.arclen(accuracy),
            PathSeg::Cubic(cubic) => cubic.arclen(accuracy),
            PathSeg::Conic(conic) => conic.arclen(accuracy),
        }
    }
}

impl ParamCurveNearest for PathSeg {
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        match *self {
            PathSeg::Line(line) => line.nearest(p, accuracy),
            PathSeg::Cubic(cubic) => cubic.nearest(p, accuracy),
            PathSeg::Conic(conic) => conic.nearest(p, accuracy),
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match *self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
            PathSeg::Conic(conic) => conic.extrema(),
        }
    }

    fn bounding_box(&self) -> Rect {
        match *self {
            PathSeg::Line(line) => line.bounding_box(),
            PathSeg::Cubic(cubic) => cubic.bounding_box(),
            PathSeg::Conic(conic) => conic.bounding_box(),
        }
    }
}

impl PathSeg {
    /// The derivative of the segment at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match *self {
            PathSeg::Line(line) => line.direction(),
            PathSeg::Cubic(cubic) => cubic.deriv().eval(t).to_vec2(),
            PathSeg::Conic(conic) => conic.tangent(t),
        }
    }

    /// The nearest position to `p` with the parameter restricted to `range`.
    ///
    /// The reported parameter is one of the whole segment.
    pub(crate) fn nearest_in_range(&self, p: Point, range: Range<f64>, accuracy: f64) -> Nearest {
        match *self {
            PathSeg::Line(line) => {
                let near = line.subsegment(range.clone()).nearest(p, accuracy);
                let t = if near.t == 0.0 {
                    range.start
                } else if near.t == 1.0 {
                    range.end
                } else {
                    range.start + near.t * (range.end - range.start)
                };
                Nearest {
                    distance_sq: line.eval(t).distance_squared(p),
                    t,
                }
            }
            PathSeg::Cubic(cubic) => {
                let d = cubic.deriv();
                nearest_in_range(
                    |t| cubic.eval(t),
                    |t| d.eval(t).to_vec2(),
                    range,
                    p,
                    accuracy,
                )
            }
            PathSeg::Conic(conic) => {
                nearest_in_range(|t| conic.eval(t), |t| conic.tangent(t), range, p, accuracy)
            }
        }
    }

    /// The path element that draws this segment from its start point.
    pub fn as_path_el(&self) -> PathEl {
        match *self {
            PathSeg::Line(line) => PathEl::LineTo(line.p1),
            PathSeg::Cubic(c) => PathEl::CurveTo(c.p1, c.p2, c.p3),
            PathSeg::Conic(c) => PathEl::ConicTo(c.p1, c.p2, c.weight),
        }
    }

    /// The control points strictly between the end points.
    ///
    /// For every supported kind (conics with positive weight included) the
    /// curve lies in the convex hull of its end points and these.
    pub(crate) fn inner_points(&self) -> ArrayVec<Point, 2> {
        let mut result = ArrayVec::new();
        match *self {
            PathSeg::Line(_) => {}
            PathSeg::Cubic(c) => {
                result.push(c.p1);
                result.push(c.p2);
            }
            PathSeg::Conic(c) => result.push(c.p1),
        }
        result
    }

    /// Is this segment finite?
    pub fn is_finite(&self) -> bool {
        match self {
            PathSeg::Line(line) => line.is_finite(),
            PathSeg::Cubic(cubic) => cubic.is_finite(),
            PathSeg::Conic(conic) => conic.is_finite(),
        }
    }
}

impl From<Line> for PathSeg {
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<CubicBez> for PathSeg {
    fn from(cubic: CubicBez) -> PathSeg {
        PathSeg::Cubic(cubic)
    }
}

impl From<ConicBez> for PathSeg {
    fn from(conic: ConicBez) -> PathSeg {
        PathSeg::Conic(conic)
    }
}

impl PathEl {
    /// Is this path element finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        match self {
            PathEl::MoveTo(p) => p.is_finite(),
            PathEl::LineTo(p) => p.is_finite(),
            PathEl::QuadTo(p, p2) => p.is_finite() && p2.is_finite(),
            PathEl::CurveTo(p, p2, p3) => p.is_finite() && p2.is_finite() && p3.is_finite(),
            PathEl::ConicTo(p, p2, w) => p.is_finite() && p2.is_finite() && w.is_finite(),
            PathEl::ClosePath => true,
        }
    }

    /// Returns the end point for the element if it can be determined.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        match self {
            PathEl::MoveTo(p) => Some(*p),
            PathEl::LineTo(p) => Some(*p),
            PathEl::QuadTo(_, p) => Some(*p),
            PathEl::CurveTo(_, _, p) => Some(*p),
            PathEl::ConicTo(_, p, _) => Some(*p),
            PathEl::ClosePath => None,
        }
    }
}
