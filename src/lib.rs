// Copyright 2025 the bezmeasure Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve intersection and arc-length measurement of 2D paths.
//!
//! Paths are built from lines, cubic Béziers and rational quadratic Béziers
//! (conics). Quadratic Béziers are accepted when building a path and are
//! raised to cubics.
//!
//! # Examples
//!
//! Intersecting two segments:
//! ```
//! use bezmeasure::{intersect, CubicBez, Line, PathSeg};
//!
//! let arch = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)));
//! let line = PathSeg::Line(Line::new((-1.0, 0.5), (2.0, 0.5)));
//! let hits = intersect(&arch, &line, 9);
//! assert_eq!(hits.len(), 2);
//! for hit in &hits {
//!     assert!((hit.point.y - 0.5).abs() < 1e-9);
//! }
//! ```
//!
//! Walking along a path:
//! ```
//! use bezmeasure::{BezPath, PathMeasure, Point};
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((10.0, 0.0));
//! path.line_to((10.0, 10.0));
//! path.close_path();
//!
//! let measure = PathMeasure::new(path, 0.1).unwrap();
//! let at = measure.point_at(15.0);
//! assert_eq!(at.point, Point::new(10.0, 5.0));
//!
//! let closest = measure.closest_point(Point::new(5.0, -1.0), f64::INFINITY).unwrap();
//! assert!((closest.offset - 5.0).abs() < 1e-6);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This crate uses the
//! `alloc` crate regardless.
//!
//! Diagnostics are emitted through the [`log`] facade.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("bezmeasure requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
mod bezpath;
pub mod common;
mod conicbez;
mod contour;
mod cubicbez;
mod intersect;
mod line;
mod measure;
mod param_curve;
mod point;
mod quadbez;
mod rect;
mod vec2;

pub use crate::affine::*;
pub use crate::bezpath::*;
pub use crate::conicbez::*;
pub use crate::contour::*;
pub use crate::cubicbez::*;
pub use crate::intersect::*;
pub use crate::line::*;
pub use crate::measure::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::rect::*;
pub use crate::vec2::*;
