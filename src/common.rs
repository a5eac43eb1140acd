// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f32 {
            #[inline]
            fn signum(self) -> f32 {
                if self.is_nan() {
                    f32::NAN
                } else {
                    1.0_f32.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lfname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("bezmeasure requires either the `std` or `libm` feature")
            })+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("bezmeasure requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn acos(self) -> Self => acos/acosf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn cbrt(self) -> Self => cbrt/cbrtf;
    fn ceil(self) -> Self => ceil/ceilf;
    fn copysign(self, sign: Self) -> Self => copysign/copysignf;
    fn cos(self) -> Self => cos/cosf;
    fn floor(self) -> Self => floor/floorf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn ln(self) -> Self => log/logf;
    fn log2(self) -> Self => log2/log2f;
    fn mul_add(self, a: Self, b: Self) -> Self => fma/fmaf;
    fn powi(self, n: i32) -> Self => pow/powf;
    fn powf(self, n: Self) -> Self => pow/powf;
    fn round(self) -> Self => round/roundf;
    fn sin(self) -> Self => sin/sinf;
    fn sin_cos(self) -> (Self, Self) => sincos/sincosf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
    fn tan(self) -> Self => tan/tanf;
    fn trunc(self) -> Self => trunc/truncf;
}

/// Coefficient magnitude below which a polynomial term is treated as zero
/// by [`solve_cubic_bernstein`].
pub const DEGENERATE_COEFF_EPSILON: f64 = 1e-4;

/// Whether a curve parameter lies in the closed unit interval.
#[inline]
pub(crate) fn in_unit_range(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}

/// Real cube root that preserves the sign of its argument.
///
/// `powf` with a fractional exponent returns NaN for negative bases; this
/// returns the negative real root instead.
#[inline]
pub fn real_cbrt(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).powf(1.0 / 3.0)
    } else {
        x.powf(1.0 / 3.0)
    }
}

/// Find the roots in [0, 1] of a cubic polynomial given in Bernstein form.
///
/// The polynomial is
///
/// ```text
/// P(t) = (1-t)³ pa + 3t(1-t)² pb + 3t²(1-t) pc + t³ pd
/// ```
///
/// which is one coordinate of a cubic Bézier. Roots outside the unit
/// interval are dropped. When the cubic coefficient is (nearly) zero the
/// equation is solved as a quadratic, and when the quadratic coefficient
/// also vanishes, as a linear equation.
///
/// The closed form follows Cardano for a single real root and the
/// trigonometric method when there are three.
pub fn solve_cubic_bernstein(pa: f64, pb: f64, pc: f64, pd: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let mut accept = |t: f64| {
        if in_unit_range(t) {
            result.push(t);
        }
    };

    let c3 = -pa + 3.0 * pb - 3.0 * pc + pd;
    let c2 = 3.0 * pa - 6.0 * pb + 3.0 * pc;
    let c1 = -3.0 * pa + 3.0 * pb;
    let c0 = pa;

    if c3.abs() < DEGENERATE_COEFF_EPSILON {
        if c2.abs() < DEGENERATE_COEFF_EPSILON {
            if c1.abs() >= DEGENERATE_COEFF_EPSILON {
                accept(-c0 / c1);
            }
            return result;
        }
        let disc = c1 * c1 - 4.0 * c2 * c0;
        if disc < 0.0 {
            return result;
        }
        let q = disc.sqrt();
        accept((-c1 + q) / (2.0 * c2));
        accept((-c1 - q) / (2.0 * c2));
        return result;
    }

    // Monic form t³ + a t² + b t + c.
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;

    // Depressed cubic u³ + p u + q with t = u - a/3.
    let p = (3.0 * b - a * a) / 3.0;
    let q = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 27.0;
    let q2 = q / 2.0;
    let p3 = p / 3.0;
    let discriminant = q2 * q2 + p3 * p3 * p3;
    let shift = a / 3.0;

    if discriminant < 0.0 {
        let mp3 = -p3;
        let r = (mp3 * mp3 * mp3).sqrt();
        let cos_phi = (-q / (2.0 * r)).clamp(-1.0, 1.0);
        let phi = cos_phi.acos();
        let t1 = 2.0 * real_cbrt(r);
        accept(t1 * (phi / 3.0).cos() - shift);
        accept(t1 * ((phi + 2.0 * core::f64::consts::PI) / 3.0).cos() - shift);
        accept(t1 * ((phi + 4.0 * core::f64::consts::PI) / 3.0).cos() - shift);
    } else if discriminant == 0.0 {
        let u1 = if q2 < 0.0 {
            real_cbrt(-q2)
        } else {
            -real_cbrt(q2)
        };
        accept(2.0 * u1 - shift);
        accept(-u1 - shift);
    } else {
        let sd = discriminant.sqrt();
        let u1 = real_cbrt(sd - q2);
        let v1 = real_cbrt(sd + q2);
        accept(u1 - v1 - shift);
    }
    result
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// This function tries to be quite numerically robust. If the equation
/// is nearly linear, it will return the root ignoring the quadratic term;
/// the other root might be out of representable range. In the degenerate
/// case where all coefficients are zero, so that all values of x satisfy
/// the equation, a single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            // Degenerate case
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // Likely, calculation of sc1 * sc1 overflowed. Find one root
        // using sc1 x + x² = 0, other root as sc0 / root1.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        // Sort just to be friendly and make results deterministic.
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

// Tables of Legendre-Gauss quadrature coefficients, adapted from:
// <https://pomax.github.io/bezierinfo/legendre-gauss.html>

pub const GAUSS_LEGENDRE_COEFFS_8: &[(f64, f64)] = &[
    (0.3626837833783620, -0.1834346424956498),
    (0.3626837833783620, 0.1834346424956498),
    (0.3137066458778873, -0.5255324099163290),
    (0.3137066458778873, 0.5255324099163290),
    (0.2223810344533745, -0.7966664774136267),
    (0.2223810344533745, 0.7966664774136267),
    (0.1012285362903763, -0.9602898564975363),
    (0.1012285362903763, 0.9602898564975363),
];
