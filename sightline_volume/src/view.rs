// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The camera abstraction consumed by projected-area estimates, and a concrete camera.

use glam::{DMat4, DVec3};
use kurbo::{Point, Size};
use sightline_math::matrix::{check_field_of_view, check_positive, perspective};
use sightline_math::{Error, Result};

use crate::frustum::Frustum;

/// What a bounding volume needs to know about the viewer.
pub trait View {
    /// Eye position in model coordinates.
    fn eye_point(&self) -> DVec3;

    /// Model-to-eye transform. The eye looks down -Z in eye coordinates.
    fn modelview(&self) -> DMat4;

    /// Window coordinates of a model-space point, with the origin at the bottom-left of the
    /// viewport, or `None` if the point cannot be projected.
    fn project(&self, model_point: DVec3) -> Option<Point>;

    /// Size in model units of one screen pixel at `distance` from the eye.
    fn pixel_size_at_distance(&self, distance: f64) -> f64;
}

/// A perspective camera: look-at orientation, horizontal field of view, and a viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    eye: DVec3,
    center: DVec3,
    up: DVec3,
    fov_x: f64,
    viewport: Size,
    near: f64,
    far: f64,
    modelview: DMat4,
    projection: DMat4,
    frustum: Frustum,
    model_frustum: Frustum,
}

impl Camera {
    /// Create a camera at `eye` looking at `center`.
    ///
    /// `fov_x` is the horizontal field of view in radians.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroDirection`] if `eye` and `center` coincide or `up` is parallel to the
    ///   view direction.
    /// - [`Error::OutOfRange`] for a field of view outside `(0, π]`, an empty viewport, or a
    ///   depth range that is not `0 < near < far`.
    pub fn new(
        eye: DVec3,
        center: DVec3,
        up: DVec3,
        fov_x: f64,
        viewport: Size,
        near: f64,
        far: f64,
    ) -> Result<Self> {
        let forward = center - eye;
        if forward.length_squared() == 0.0 || forward.cross(up).length_squared() == 0.0 {
            return Err(Error::ZeroDirection);
        }
        check_field_of_view(fov_x)?;
        check_positive("viewport width", viewport.width)?;
        check_positive("viewport height", viewport.height)?;

        let modelview = DMat4::look_at_rh(eye, center, up);
        let projection = perspective(fov_x, viewport.width, viewport.height, near, far)?;
        let frustum = Frustum::from_perspective(fov_x, viewport.width, viewport.height, near, far)?;
        // Planes go from eye to model space by the transpose of the model-view matrix.
        let model_frustum = frustum.transform(&modelview.transpose())?;

        Ok(Self {
            eye,
            center,
            up,
            fov_x,
            viewport,
            near,
            far,
            modelview,
            projection,
            frustum,
            model_frustum,
        })
    }

    /// The point the camera looks at.
    pub const fn center(&self) -> DVec3 {
        self.center
    }

    /// The up hint the orientation was built from.
    pub const fn up(&self) -> DVec3 {
        self.up
    }

    /// Horizontal field of view in radians.
    pub const fn fov_x(&self) -> f64 {
        self.fov_x
    }

    /// Viewport size in pixels.
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Near and far clip distances.
    pub const fn depth_range(&self) -> (f64, f64) {
        (self.near, self.far)
    }

    /// The projection matrix.
    pub const fn projection(&self) -> DMat4 {
        self.projection
    }

    /// The view volume in eye coordinates.
    pub const fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// The view volume in model coordinates.
    pub const fn frustum_in_model_coordinates(&self) -> &Frustum {
        &self.model_frustum
    }
}

impl View for Camera {
    fn eye_point(&self) -> DVec3 {
        self.eye
    }

    fn modelview(&self) -> DMat4 {
        self.modelview
    }

    fn project(&self, model_point: DVec3) -> Option<Point> {
        let clip = self.projection * (self.modelview * model_point.extend(1.0));
        if clip.w == 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Point::new(
            self.viewport.width * (ndc.x + 1.0) * 0.5,
            self.viewport.height * (ndc.y + 1.0) * 0.5,
        ))
    }

    fn pixel_size_at_distance(&self, distance: f64) -> f64 {
        distance.abs() * 2.0 * (self.fov_x * 0.5).tan() / self.viewport.width
    }
}
