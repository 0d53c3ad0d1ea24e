// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point sources: anything that can visit a set of 3D points, more than once.

use glam::DVec3;

use crate::error::{Error, Result};

/// A re-iterable source of points.
///
/// Bounding-volume construction walks its input several times (mean, covariance, extents),
/// so sources are borrowed rather than consumed. Missing entries are skipped by the
/// implementation and never reach the visitor.
pub trait PointSet {
    /// Visit every present point in order.
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F);

    /// Number of present points.
    fn count_points(&self) -> usize {
        let mut n = 0;
        self.for_each_point(|_| n += 1);
        n
    }
}

impl PointSet for [DVec3] {
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F) {
        self.iter().copied().for_each(f);
    }

    fn count_points(&self) -> usize {
        self.len()
    }
}

impl PointSet for [Option<DVec3>] {
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F) {
        self.iter().flatten().copied().for_each(f);
    }
}

impl<const N: usize> PointSet for [DVec3; N] {
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F) {
        self.as_slice().for_each_point(f);
    }

    fn count_points(&self) -> usize {
        N
    }
}

impl<T> PointSet for Vec<T>
where
    [T]: PointSet,
{
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F) {
        self.as_slice().for_each_point(f);
    }

    fn count_points(&self) -> usize {
        self.as_slice().count_points()
    }
}

impl<P: PointSet + ?Sized> PointSet for &P {
    fn for_each_point<F: FnMut(DVec3)>(&self, f: F) {
        (**self).for_each_point(f);
    }

    fn count_points(&self) -> usize {
        (**self).count_points()
    }
}

/// XYZ tuples read out of a flat coordinate buffer.
///
/// The stride is the number of elements between the first coordinates of consecutive tuples:
/// `3` reads tightly packed `XYZXYZ`, `5` reads `XYZabXYZab` and ignores `a` and `b`.
/// Elements after the last complete tuple are ignored.
#[derive(Clone, Copy, Debug)]
pub struct Strided<'a> {
    coords: &'a [f64],
    stride: usize,
}

impl<'a> Strided<'a> {
    /// Wrap `coords` with the given stride.
    ///
    /// Returns [`Error::InvalidStride`] if `stride < 3`.
    pub fn new(coords: &'a [f64], stride: usize) -> Result<Self> {
        if stride < 3 {
            return Err(Error::InvalidStride { stride });
        }
        Ok(Self { coords, stride })
    }

    /// Tightly packed XYZ tuples.
    pub const fn packed(coords: &'a [f64]) -> Self {
        Self { coords, stride: 3 }
    }

    /// The stride between tuples.
    pub const fn stride(&self) -> usize {
        self.stride
    }
}

impl PointSet for Strided<'_> {
    fn for_each_point<F: FnMut(DVec3)>(&self, mut f: F) {
        for tuple in self.coords.chunks_exact(self.stride) {
            f(DVec3::new(tuple[0], tuple[1], tuple[2]));
        }
    }

    fn count_points(&self) -> usize {
        self.coords.len() / self.stride
    }
}

/// Arithmetic mean of the present points, or `None` if there are none.
pub fn centroid<P: PointSet + ?Sized>(points: &P) -> Option<DVec3> {
    let mut sum = DVec3::ZERO;
    let mut n = 0_usize;
    points.for_each_point(|p| {
        sum += p;
        n += 1;
    });
    (n > 0).then(|| sum / n as f64)
}
