// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sightline_math --heading-base-level=0

//! Sightline Math: the linear-algebra layer under Sightline's bounding volumes.
//!
//! Vectors and matrices are [`glam`]'s `f64` types ([`glam::DVec3`], [`glam::DVec4`],
//! [`glam::DMat3`], [`glam::DMat4`]). This crate adds what a culling kernel needs on top:
//!
//! - [`PointSet`]: borrowed, re-iterable point sources (slices, slices of `Option`, and
//!   [`Strided`] coordinate buffers).
//! - [`covariance`], [`JacobiSolver`], and [`principal_axes`]: orientation of a point cloud
//!   from the eigenvectors of its covariance matrix.
//! - [`Plane`] and [`Line`]: half-space and ray queries, including [`intersect_polytope`].
//! - [`matrix`]: a general LU inverse that reports singularity, and projection matrices.
//!
//! All operations are pure functions of immutable values.
//! Invalid construction input is rejected with an [`Error`]; degenerate but valid geometry is
//! handled by documented fallbacks instead.
//!
//! # Example
//!
//! ```rust
//! use glam::DVec3;
//! use sightline_math::principal_axes;
//!
//! // A long, thin cloud along X.
//! let points: Vec<DVec3> = (0..10)
//!     .flat_map(|i| {
//!         let x = i as f64;
//!         [DVec3::new(x, 0.1, 0.0), DVec3::new(x, -0.1, 0.0)]
//!     })
//!     .collect();
//!
//! let axes = principal_axes(&points).unwrap();
//! assert!(axes.axes[0].dot(DVec3::X).abs() > 0.999);
//! assert!(axes.variances[0] > axes.variances[1]);
//! ```

pub mod error;
pub mod line;
pub mod matrix;
pub mod plane;
pub mod points;
pub mod principal;

pub use error::{Error, Result};
pub use line::{Intersection, Line, LineHits, intersect_polytope};
pub use matrix::try_inverse;
pub use plane::{LineCrossing, Plane, SegmentCrossing, Side};
pub use points::{PointSet, Strided, centroid};
pub use principal::{JacobiSolver, PrincipalAxes, SymmetricEigen, covariance, principal_axes};
