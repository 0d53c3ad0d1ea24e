// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sightline_volume --heading-base-level=0

//! Sightline Volume: bounding volumes for view-frustum culling and level of detail.
//!
//! A renderer asks two questions of every object in a scene each frame: can it be seen at
//! all, and how large does it appear? This crate answers both for tight, arbitrarily oriented
//! bounds.
//!
//! - [`OrientedBox`]: a box along the principal axes of a point set, built with
//!   [`OrientedBox::from_points`], from explicit extents, or as the [`OrientedBox::union`] of
//!   other boxes.
//! - [`Cylinder`]: a capped cylinder along the principal axis of a point set.
//! - [`Frustum`]: six inward-facing planes of a view volume, from a projection matrix, a
//!   perspective or orthographic description, or four corner rays.
//! - [`Extent`]: what both volumes offer: enclosing sphere, plane, line, and frustum tests,
//!   and an estimate of [`ProjectedArea`] on screen.
//! - [`View`] and [`Camera`]: the viewer a projected-area estimate is made for.
//!
//! ## Culling
//!
//! Boxes and cylinders implement [`OrientedVolume`]: each is a cross-section swept along a
//! central segment. The frustum test walks the planes near, far, left, right, top, bottom,
//! and against each either rejects the volume or trims the segment to the part that might
//! still be visible. The test is conservative: a volume just beyond a frustum corner may be
//! reported as visible, a visible one is never rejected.
//!
//! ## Screen area
//!
//! [`OrientedBox`] computes the exact area of its silhouette. The faces the eye can see are
//! encoded in a [`FaceMask`], which selects the outline corners from a fixed table. The area
//! is [`ProjectedArea::Unbounded`] when the eye is inside the box or part of the outline is
//! behind it. [`Cylinder`] approximates its area by that of its enclosing sphere.
//!
//! Linear algebra comes from [`sightline_math`], over [`glam`]'s `f64` types.
//!
//! # Example
//!
//! ```rust
//! use core::f64::consts::FRAC_PI_2;
//!
//! use glam::DVec3;
//! use kurbo::Size;
//! use sightline_volume::{Camera, Extent, OrientedBox, ProjectedArea};
//!
//! // A small cloud ten units in front of a camera at the origin.
//! let points = [
//!     DVec3::new(-1.0, -0.5, -10.0),
//!     DVec3::new(1.0, 0.5, -10.0),
//!     DVec3::new(0.5, -0.5, -10.5),
//!     DVec3::new(-0.5, 0.5, -9.5),
//! ];
//! let bounds = OrientedBox::from_points(&points);
//!
//! let camera = Camera::new(
//!     DVec3::ZERO,
//!     DVec3::NEG_Z,
//!     DVec3::Y,
//!     FRAC_PI_2,
//!     Size::new(640.0, 480.0),
//!     0.1,
//!     100.0,
//! )
//! .unwrap();
//!
//! assert!(camera.frustum_in_model_coordinates().intersects(&bounds));
//! let ProjectedArea::Finite(area) = bounds.projected_area(&camera) else {
//!     panic!("the box is in front of the camera");
//! };
//! assert!(area > 0.0);
//!
//! // Far off to the side, the same box is culled.
//! let aside = bounds.translate(DVec3::new(500.0, 0.0, 0.0));
//! assert!(!camera.frustum_in_model_coordinates().intersects(&aside));
//! ```

pub mod cylinder;
pub mod extent;
pub mod frustum;
pub mod oriented_box;
pub mod silhouette;
pub mod view;

pub use cylinder::Cylinder;
pub use extent::{Extent, OrientedVolume};
pub use frustum::{Frustum, FrustumCorners};
pub use oriented_box::OrientedBox;
pub use silhouette::{FaceMask, ProjectedArea, polygon_area, silhouette, sphere_projected_area};
pub use view::{Camera, View};

pub use sightline_math::{Error, Result};
