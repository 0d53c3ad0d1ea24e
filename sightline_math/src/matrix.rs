// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Matrix helpers that glam does not provide directly.
//!
//! - [`try_inverse`]: general 4×4 inverse by LU decomposition with partial pivoting, returning
//!   `None` for singular input instead of a matrix full of infinities.
//! - [`perspective`], [`perspective_from_size`], and [`orthographic`]: OpenGL-style projection
//!   matrices looking down -Z. The perspective variant takes a *horizontal* field of view.
//!
//! Determinant, transpose, and look-at come straight from [`glam::DMat4`].

use core::f64::consts::PI;

use glam::DMat4;

use crate::error::{Error, Result};

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULARITY_THRESHOLD: f64 = 1.0e-8;

/// Substituted for an exactly zero pivot so the decomposition can continue.
const TINY: f64 = 1.0e-20;

/// Build a matrix from rows given in reading order.
pub fn from_rows(rows: [[f64; 4]; 4]) -> DMat4 {
    DMat4::from_cols_array_2d(&rows).transpose()
}

/// Inverse of `m`, or `None` if `m` is singular.
///
/// Uses Crout LU decomposition with implicit partial pivoting. A row of all zeros ends the
/// decomposition early and reports a zero determinant, which also yields `None`.
pub fn try_inverse(m: &DMat4) -> Option<DMat4> {
    // Row-major working copy.
    let mut a = m.transpose().to_cols_array_2d();
    let mut index = [0_usize; 4];

    let mut det = lu_decompose(&mut a, &mut index);
    for (i, row) in a.iter().enumerate() {
        det *= row[i];
    }
    if det.abs() < SINGULARITY_THRESHOLD {
        tracing::trace!(det, "matrix is singular");
        return None;
    }

    let mut inv = [[0.0; 4]; 4];
    for j in 0..4 {
        let mut col = [0.0; 4];
        col[j] = 1.0;
        lu_back_substitute(&a, &index, &mut col);
        for (i, value) in col.into_iter().enumerate() {
            inv[i][j] = value;
        }
    }
    Some(from_rows(inv))
}

/// Decompose `a` in place into L and U; returns the permutation parity, or `0.0` when a row
/// is entirely zero.
fn lu_decompose(a: &mut [[f64; 4]; 4], index: &mut [usize; 4]) -> f64 {
    let mut scale = [0.0; 4];
    for (i, row) in a.iter().enumerate() {
        let big = row.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if big == 0.0 {
            return 0.0;
        }
        scale[i] = 1.0 / big;
    }

    let mut parity = 1.0;
    for j in 0..4 {
        for i in 0..j {
            let mut sum = a[i][j];
            for k in 0..i {
                sum -= a[i][k] * a[k][j];
            }
            a[i][j] = sum;
        }

        let mut big = 0.0;
        let mut imax = j;
        for i in j..4 {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= a[i][k] * a[k][j];
            }
            a[i][j] = sum;

            let figure = scale[i] * sum.abs();
            if figure >= big {
                big = figure;
                imax = i;
            }
        }

        if j != imax {
            a.swap(imax, j);
            parity = -parity;
            scale[imax] = scale[j];
        }

        index[j] = imax;
        if a[j][j] == 0.0 {
            a[j][j] = TINY;
        }

        if j != 3 {
            let inv_pivot = 1.0 / a[j][j];
            for row in a.iter_mut().skip(j + 1) {
                row[j] *= inv_pivot;
            }
        }
    }
    parity
}

/// Solve `A x = b` in place, given the output of [`lu_decompose`].
fn lu_back_substitute(a: &[[f64; 4]; 4], index: &[usize; 4], b: &mut [f64; 4]) {
    let mut first_nonzero: Option<usize> = None;
    for i in 0..4 {
        let ip = index[i];
        let mut sum = b[ip];
        b[ip] = b[i];
        if let Some(start) = first_nonzero {
            for j in start..i {
                sum -= a[i][j] * b[j];
            }
        } else if sum != 0.0 {
            first_nonzero = Some(i);
        }
        b[i] = sum;
    }

    for i in (0..4).rev() {
        let mut sum = b[i];
        for j in i + 1..4 {
            sum -= a[i][j] * b[j];
        }
        b[i] = sum / a[i][i];
    }
}

/// Validate that a named parameter is strictly positive.
pub fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::OutOfRange { name, value })
    }
}

/// Validate a near/far pair: both positive and `far > near`.
pub fn check_depth_range(near: f64, far: f64) -> Result<()> {
    check_positive("near", near)?;
    check_positive("far", far)?;
    if far <= near {
        return Err(Error::OutOfRange {
            name: "far - near",
            value: far - near,
        });
    }
    Ok(())
}

/// Validate a horizontal field of view in radians, `0 < fov <= π`.
pub fn check_field_of_view(fov_x: f64) -> Result<()> {
    if fov_x > 0.0 && fov_x <= PI {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            name: "horizontal field of view",
            value: fov_x,
        })
    }
}

/// Perspective projection from a horizontal field of view (radians) and viewport size.
///
/// The vertical scale is derived from the viewport aspect ratio, so the same horizontal
/// field of view is kept when the viewport is resized.
pub fn perspective(
    fov_x: f64,
    viewport_width: f64,
    viewport_height: f64,
    near: f64,
    far: f64,
) -> Result<DMat4> {
    check_field_of_view(fov_x)?;
    check_positive("viewport width", viewport_width)?;
    check_positive("viewport height", viewport_height)?;
    check_depth_range(near, far)?;

    let f = 1.0 / (fov_x * 0.5).tan();
    let depth = far - near;
    Ok(from_rows([
        [f, 0.0, 0.0, 0.0],
        [0.0, f * viewport_width / viewport_height, 0.0, 0.0],
        [0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth],
        [0.0, 0.0, -1.0, 0.0],
    ]))
}

/// Perspective projection from the size of the near-plane window.
pub fn perspective_from_size(width: f64, height: f64, near: f64, far: f64) -> Result<DMat4> {
    check_positive("width", width)?;
    check_positive("height", height)?;
    check_depth_range(near, far)?;

    let depth = far - near;
    Ok(from_rows([
        [2.0 / width, 0.0, 0.0, 0.0],
        [0.0, 2.0 * near / height, 0.0, 0.0],
        [0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth],
        [0.0, 0.0, -1.0, 0.0],
    ]))
}

/// Orthographic projection of a `width` × `height` box between `near` and `far`.
pub fn orthographic(width: f64, height: f64, near: f64, far: f64) -> Result<DMat4> {
    check_positive("width", width)?;
    check_positive("height", height)?;
    check_depth_range(near, far)?;

    let depth = far - near;
    Ok(from_rows([
        [2.0 / width, 0.0, 0.0, 0.0],
        [0.0, 2.0 / height, 0.0, 0.0],
        [0.0, 0.0, -2.0 / depth, -(far + near) / depth],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}
