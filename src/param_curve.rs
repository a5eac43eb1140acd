// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A trait for curves parametrized by a scalar.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A curve parametrized by a scalar.
///
/// If the result is interpreted as a point, this represents a curve.
/// But the result can be interpreted as a vector as well.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range [0..1].
    fn eval(&self, t: f64) -> Point;

    /// Get a subsegment of the curve for the given parameter range.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// Subdivide into (roughly) halves.
    #[inline]
    fn subdivide(&self) -> (Self, Self) {
        (self.subsegment(0.0..0.5), self.subsegment(0.5..1.0))
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

/// A differentiable parametrized curve.
pub trait ParamCurveDeriv {
    /// The parametric curve obtained by taking the derivative of this one.
    type DerivResult: ParamCurve;

    /// The derivative of the curve.
    ///
    /// Note that the type of the return value is somewhat inaccurate, as
    /// the derivative of a curve (mapping of param to point) is a mapping
    /// of param to vector. We choose to accept this rather than have a
    /// more complex type scheme.
    fn deriv(&self) -> Self::DerivResult;
}

/// A parametrized curve that can have its arc length measured.
pub trait ParamCurveArclen: ParamCurve {
    /// The arc length of the curve.
    ///
    /// The result is accurate to the given accuracy (subject to
    /// roundoff errors for ridiculously low values). Compute time
    /// may vary with accuracy, if the curve needs to be subdivided.
    fn arclen(&self, accuracy: f64) -> f64;
}

/// The nearest position on a curve to some point.
///
/// This is returned by [`ParamCurveNearest::nearest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// The square of the distance from the nearest position on the curve
    /// to the given point.
    pub distance_sq: f64,
    /// The position on the curve of the nearest point, as a parameter.
    ///
    /// To resolve this to a [`Point`], use [`ParamCurve::eval`].
    pub t: f64,
}

/// A parametrized curve that reports the nearest point.
pub trait ParamCurveNearest {
    /// Find the position on the curve that is nearest to the given point.
    ///
    /// Curves refine the parameter until a step moves the point by no more
    /// than `accuracy`. When several positions are equally near, the one
    /// with the smallest parameter is reported.
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest;
}

/// Samples taken to bracket the nearest position before refining it.
const NEAREST_SAMPLES: u32 = 16;

/// Cap on the refinement steps of [`nearest_in_range`].
const NEAREST_ITERATIONS: usize = 32;

/// The position nearest `p` on a smooth curve, over `range` of its
/// parameter.
///
/// Uniform samples bracket the minimum of the squared distance. Inside the
/// bracket, Newton steps solve `(B(t) - p)·B'(t) = 0`, falling back to
/// bisection whenever a step would leave the bracket.
pub(crate) fn nearest_in_range(
    eval: impl Fn(f64) -> Point,
    deriv: impl Fn(f64) -> Vec2,
    range: Range<f64>,
    p: Point,
    accuracy: f64,
) -> Nearest {
    let (a, b) = (range.start, range.end);
    let sample = |i: u32| {
        if i >= NEAREST_SAMPLES {
            b
        } else {
            a + (b - a) * (f64::from(i) / f64::from(NEAREST_SAMPLES))
        }
    };
    let dist_sq = |t: f64| eval(t).distance_squared(p);

    let mut best = Nearest {
        distance_sq: dist_sq(a),
        t: a,
    };
    let mut best_i = 0;
    for i in 1..=NEAREST_SAMPLES {
        let t = sample(i);
        let distance_sq = dist_sq(t);
        if distance_sq < best.distance_sq {
            best = Nearest { distance_sq, t };
            best_i = i;
        }
    }

    // Half the derivative of the squared distance.
    let g = |t: f64| (eval(t) - p).dot(deriv(t));
    let g_best = g(best.t);
    let (mut lo, mut hi) = if g_best > 0.0 {
        (sample(best_i.saturating_sub(1)), best.t)
    } else if g_best < 0.0 {
        (best.t, sample(best_i + 1))
    } else {
        return best;
    };
    // Without a sign change the minimum is at a sample.
    if !(lo < hi && g(lo) < 0.0 && g(hi) > 0.0) {
        return best;
    }
    let h = 1e-6 * (hi - lo);
    let mut t = best.t;
    for _ in 0..NEAREST_ITERATIONS {
        let gt = g(t);
        if gt == 0.0 {
            break;
        }
        if gt < 0.0 {
            lo = t;
        } else {
            hi = t;
        }
        let slope = (g(t + h) - g(t - h)) / (2.0 * h);
        let mut next = t - gt / slope;
        // Also catches a NaN step.
        if !(next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }
        let step = (next - t).abs();
        t = next;
        if step == 0.0 || step * deriv(t).hypot() <= accuracy {
            break;
        }
    }
    let distance_sq = dist_sq(t);
    if distance_sq < best.distance_sq {
        best = Nearest { distance_sq, t };
    }
    best
}

/// The maximum number of extrema that can be reported in the
/// `ParamCurveExtrema` trait.
///
/// This is 4 to accommodate cubic Béziers and conics, one pair of
/// candidates for each coordinate.
pub const MAX_EXTREMA: usize = 4;

/// A parametrized curve that reports its extrema.
pub trait ParamCurveExtrema: ParamCurve {
    /// Compute the extrema of the curve.
    ///
    /// Only extrema within the interior of the curve count.
    /// At most four extrema can be reported, which is sufficient for
    /// cubic Béziers and conics.
    ///
    /// The extrema should be reported in increasing parameter order.
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA>;

    /// Return parameter ranges, each of which is monotonic within the range.
    fn extrema_ranges(&self) -> ArrayVec<Range<f64>, { MAX_EXTREMA + 1 }> {
        let mut result = ArrayVec::new();
        let mut t0 = 0.0;
        for t in self.extrema() {
            result.push(t0..t);
            t0 = t;
        }
        result.push(t0..1.0);
        result
    }

    /// The smallest rectangle that encloses the curve in the range (0..1).
    fn bounding_box(&self) -> Rect {
        let mut bbox = Rect::from_points(self.start(), self.end());
        for t in self.extrema() {
            bbox = bbox.union_pt(self.eval(t));
        }
        bbox
    }
}
