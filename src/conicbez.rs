// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conic segments, represented as rational quadratic Béziers.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::common::{solve_quadratic, GAUSS_LEGENDRE_COEFFS_8};
use crate::param_curve::nearest_in_range;
use crate::{
    Affine, Nearest, ParamCurve, ParamCurveArclen, ParamCurveExtrema, ParamCurveNearest, Point,
    Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

const MAX_ARCLEN_DEPTH: usize = 16;

/// A conic segment.
///
/// This is a rational quadratic Bézier with weight 1 on both end points and
/// `weight` on the control point:
///
/// ```text
///        (1-t)² p0 + 2t(1-t) w p1 + t² p2
/// C(t) = ---------------------------------
///          (1-t)² + 2t(1-t) w + t²
/// ```
///
/// A weight below 1 gives an elliptical arc, exactly 1 a parabola (the
/// ordinary quadratic Bézier), and above 1 a hyperbolic arc. The weight is
/// expected to be positive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConicBez {
    /// Start point.
    pub p0: Point,
    /// Control point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
    /// Weight of the control point.
    pub weight: f64,
}

/// A point in homogeneous coordinates, `(x·w, y·w, w)`.
#[derive(Clone, Copy)]
struct Homogeneous {
    x: f64,
    y: f64,
    w: f64,
}

impl Homogeneous {
    fn weighted(p: Point, w: f64) -> Self {
        Homogeneous {
            x: p.x * w,
            y: p.y * w,
            w,
        }
    }

    fn combine(a: f64, p: Self, b: f64, q: Self, c: f64, r: Self) -> Self {
        Homogeneous {
            x: a * p.x + b * q.x + c * r.x,
            y: a * p.y + b * q.y + c * r.y,
            w: a * p.w + b * q.w + c * r.w,
        }
    }

    fn project(self) -> Point {
        Point::new(self.x / self.w, self.y / self.w)
    }
}

impl ConicBez {
    /// Create a new conic segment.
    #[inline(always)]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, weight: f64) -> ConicBez {
        ConicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            weight,
        }
    }

    /// Is this conic finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.weight.is_finite()
    }

    /// The derivative of the curve at parameter `t`.
    ///
    /// Unlike polynomial curves, the derivative of a conic is not a curve of
    /// the same family, so this is exposed directly rather than through
    /// [`ParamCurveDeriv`](crate::ParamCurveDeriv).
    pub fn tangent(&self, t: f64) -> Vec2 {
        let (n, dn) = self.numerator(t);
        let (d, dd) = self.denominator(t);
        (dn * d - n * dd) / (d * d)
    }

    /// Numerator of the rational form and its derivative at `t`.
    fn numerator(&self, t: f64) -> (Vec2, Vec2) {
        let mt = 1.0 - t;
        let p0 = self.p0.to_vec2();
        let p1 = self.p1.to_vec2() * self.weight;
        let p2 = self.p2.to_vec2();
        let n = p0 * (mt * mt) + p1 * (2.0 * t * mt) + p2 * (t * t);
        let dn = 2.0 * (mt * (p1 - p0) + t * (p2 - p1));
        (n, dn)
    }

    /// Denominator of the rational form and its derivative at `t`.
    fn denominator(&self, t: f64) -> (f64, f64) {
        let mt = 1.0 - t;
        let w = self.weight;
        let d = mt * mt + 2.0 * t * mt * w + t * t;
        let dd = 2.0 * (mt * (w - 1.0) + t * (1.0 - w));
        (d, dd)
    }

    /// Estimate of the arc length over `range` by 8-point Gauss-Legendre
    /// quadrature of the speed.
    fn gauss_arclen(&self, range: Range<f64>) -> f64 {
        let half = 0.5 * (range.end - range.start);
        let mid = 0.5 * (range.end + range.start);
        GAUSS_LEGENDRE_COEFFS_8
            .iter()
            .map(|(wi, xi)| wi * self.tangent(mid + half * xi).hypot())
            .sum::<f64>()
            * half
    }
}

impl ParamCurve for ConicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let (n, _) = self.numerator(t);
        let (d, _) = self.denominator(t);
        (n / d).to_point()
    }

    /// The same conic restricted to `range`, reparametrized over [0, 1].
    ///
    /// The sub-curve is obtained by blossoming the homogeneous control
    /// points and renormalizing so the end weights are 1 again.
    fn subsegment(&self, range: Range<f64>) -> ConicBez {
        let (t0, t1) = (range.start, range.end);
        let h0 = Homogeneous::weighted(self.p0, 1.0);
        let h1 = Homogeneous::weighted(self.p1, self.weight);
        let h2 = Homogeneous::weighted(self.p2, 1.0);
        let blossom = |a: f64, b: f64| {
            Homogeneous::combine(
                (1.0 - a) * (1.0 - b),
                h0,
                (1.0 - a) * b + a * (1.0 - b),
                h1,
                a * b,
                h2,
            )
        };
        let q0 = blossom(t0, t0);
        let q1 = blossom(t0, t1);
        let q2 = blossom(t1, t1);
        let p1 = if q1.w != 0.0 {
            q1.project()
        } else {
            self.p1
        };
        ConicBez {
            p0: q0.project(),
            p1,
            p2: q2.project(),
            weight: q1.w / (q0.w * q2.w).sqrt(),
        }
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p2
    }
}

impl ParamCurveArclen for ConicBez {
    /// Arc length of a conic.
    ///
    /// The parameter range is halved until the quadrature estimate of the
    /// whole agrees with the sum over its halves.
    fn arclen(&self, accuracy: f64) -> f64 {
        fn rec(c: &ConicBez, range: Range<f64>, whole: f64, accuracy: f64, depth: usize) -> f64 {
            let tm = 0.5 * (range.start + range.end);
            let left = c.gauss_arclen(range.start..tm);
            let right = c.gauss_arclen(tm..range.end);
            if (left + right - whole).abs() < accuracy || depth == MAX_ARCLEN_DEPTH {
                left + right
            } else {
                rec(c, range.start..tm, left, accuracy * 0.5, depth + 1)
                    + rec(c, tm..range.end, right, accuracy * 0.5, depth + 1)
            }
        }
        rec(self, 0.0..1.0, self.gauss_arclen(0.0..1.0), accuracy, 0)
    }
}

impl ParamCurveNearest for ConicBez {
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        nearest_in_range(|t| self.eval(t), |t| self.tangent(t), 0.0..1.0, p, accuracy)
    }
}

impl ParamCurveExtrema for ConicBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        // With N = n0 + n1 t + n2 t² and D likewise, the derivative of N/D
        // vanishes where N'D - ND' does, and the cubic terms cancel.
        let w = self.weight;
        let (d0, d1, d2) = (1.0, 2.0 * (w - 1.0), 2.0 - 2.0 * w);
        let mut result = ArrayVec::new();
        let mut one_coord = |q0: f64, q1: f64, q2: f64| {
            let q1 = q1 * w;
            let (n0, n1, n2) = (q0, 2.0 * (q1 - q0), q0 - 2.0 * q1 + q2);
            let c0 = n1 * d0 - n0 * d1;
            let c1 = 2.0 * (n2 * d0 - n0 * d2);
            let c2 = n2 * d1 - n1 * d2;
            for t in solve_quadratic(c0, c1, c2) {
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        };
        one_coord(self.p0.x, self.p1.x, self.p2.x);
        one_coord(self.p0.y, self.p1.y, self.p2.y);
        result.sort_by(f64::total_cmp);
        result
    }
}

impl Mul<ConicBez> for Affine {
    type Output = ConicBez;

    #[inline]
    fn mul(self, c: ConicBez) -> ConicBez {
        ConicBez {
            p0: self * c.p0,
            p1: self * c.p1,
            p2: self * c.p2,
            weight: c.weight,
        }
    }
}
