// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covariance, symmetric eigen-decomposition, and principal axes of a point set.
//!
//! The eigen solver is a bounded cyclic Jacobi sweep over the three off-diagonal entries of a
//! symmetric 3×3 matrix. Each annihilation applies one Givens rotation to the working matrix
//! and accumulates it into the eigenvector matrix. The result is deterministic: the sweep
//! order is fixed at (1,2), (1,3), (2,3) and no randomized pivoting is used.

use glam::{DMat3, DVec3};

use crate::error::{Error, Result};
use crate::points::{PointSet, centroid};

/// Default cap on the number of Jacobi sweeps.
pub const DEFAULT_MAX_SWEEPS: usize = 32;

/// Default off-diagonal magnitude below which the matrix is considered diagonal.
pub const DEFAULT_EPSILON: f64 = 1.0e-10;

/// Covariance matrix of the present points about their mean, or `None` if there are none.
///
/// Entries are normalized by the point count, `C(i, j) = (1/n) Σ (p_i - mean_i)(p_j - mean_j)`.
/// The result is symmetric by construction.
pub fn covariance<P: PointSet + ?Sized>(points: &P) -> Option<DMat3> {
    let mean = centroid(points)?;

    let mut diag = DVec3::ZERO;
    // (xy, xz, yz)
    let mut off = DVec3::ZERO;
    let mut n = 0_usize;
    points.for_each_point(|p| {
        let d = p - mean;
        diag += d * d;
        off += DVec3::new(d.x * d.y, d.x * d.z, d.y * d.z);
        n += 1;
    });

    let inv = 1.0 / n as f64;
    let diag = diag * inv;
    let off = off * inv;
    Some(DMat3::from_cols(
        DVec3::new(diag.x, off.x, off.y),
        DVec3::new(off.x, diag.y, off.z),
        DVec3::new(off.y, off.z, diag.z),
    ))
}

/// Eigenvalues and eigenvectors of a symmetric 3×3 matrix, in solver order (unsorted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymmetricEigen {
    /// Eigenvalues; `values[i]` belongs to `vectors[i]`.
    pub values: [f64; 3],
    /// Mutually orthogonal eigenvectors.
    pub vectors: [DVec3; 3],
}

/// Settings for the cyclic Jacobi eigen solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JacobiSolver {
    /// Maximum number of full sweeps over the off-diagonal entries.
    pub max_sweeps: usize,
    /// Convergence threshold on every off-diagonal magnitude.
    pub epsilon: f64,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            max_sweeps: DEFAULT_MAX_SWEEPS,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl JacobiSolver {
    /// Diagonalize a symmetric matrix.
    ///
    /// The matrix must be exactly symmetric; any mismatch between mirrored entries yields
    /// [`Error::NotSymmetric`]. Hitting the sweep cap is not an error: the current diagonal
    /// and rotation are returned as the best available estimate.
    pub fn solve(&self, matrix: &DMat3) -> Result<SymmetricEigen> {
        // Row-major copy; a[i][j] is row i, column j.
        let mut a = matrix.transpose().to_cols_array_2d();
        if a[0][1] != a[1][0] || a[0][2] != a[2][0] || a[1][2] != a[2][1] {
            tracing::warn!(?matrix, "rejecting non-symmetric matrix");
            return Err(Error::NotSymmetric);
        }

        let mut r = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let converged = |a: &[[f64; 3]; 3]| {
            a[0][1].abs() < self.epsilon
                && a[0][2].abs() < self.epsilon
                && a[1][2].abs() < self.epsilon
        };
        for _ in 0..self.max_sweeps {
            if converged(&a) {
                break;
            }
            annihilate(&mut a, &mut r, 0, 1, 2);
            annihilate(&mut a, &mut r, 0, 2, 1);
            annihilate(&mut a, &mut r, 1, 2, 0);
        }
        if !converged(&a) {
            tracing::warn!(
                sweeps = self.max_sweeps,
                "Jacobi solver stopped before the off-diagonal converged"
            );
        }

        let column = |j: usize| DVec3::new(r[0][j], r[1][j], r[2][j]);
        Ok(SymmetricEigen {
            values: [a[0][0], a[1][1], a[2][2]],
            vectors: [column(0), column(1), column(2)],
        })
    }
}

/// Zero `a[i][j]` with one Givens rotation; `k` is the remaining index.
fn annihilate(a: &mut [[f64; 3]; 3], r: &mut [[f64; 3]; 3], i: usize, j: usize, k: usize) {
    let m_ij = a[i][j];
    if m_ij == 0.0 {
        return;
    }

    let u = (a[j][j] - a[i][i]) * 0.5 / m_ij;
    let u2 = u * u;
    let u2p1 = u2 + 1.0;
    // u² can swamp the added 1 for tiny off-diagonal entries.
    let t = if u2p1 != u2 {
        let sign = if u < 0.0 { -1.0 } else { 1.0 };
        sign * (u2p1.sqrt() - u.abs())
    } else {
        0.5 / u
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = c * t;

    a[i][i] -= t * m_ij;
    a[j][j] += t * m_ij;
    a[i][j] = 0.0;
    a[j][i] = 0.0;

    let m_ik = c * a[i][k] - s * a[j][k];
    let m_jk = s * a[i][k] + c * a[j][k];
    a[i][k] = m_ik;
    a[k][i] = m_ik;
    a[j][k] = m_jk;
    a[k][j] = m_jk;

    for row in r.iter_mut() {
        let ri = c * row[i] - s * row[j];
        row[j] = s * row[i] + c * row[j];
        row[i] = ri;
    }
}

/// Three orthonormal axes of a point set, from most to least prominent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrincipalAxes {
    /// Unit axes R, S, T ordered by decreasing variance.
    pub axes: [DVec3; 3],
    /// Variance along each axis (the sorted covariance eigenvalues).
    pub variances: [f64; 3],
}

impl PrincipalAxes {
    /// Sort an eigen-decomposition by decreasing eigenvalue and normalize its vectors.
    ///
    /// Equal eigenvalues keep the reverse of their solver order.
    pub fn from_eigen(eigen: &SymmetricEigen) -> Self {
        let mut order = [0_usize, 1, 2];
        order.sort_by(|&a, &b| eigen.values[a].total_cmp(&eigen.values[b]));
        order.reverse();
        Self {
            axes: order.map(|i| eigen.vectors[i].normalize_or_zero()),
            variances: order.map(|i| eigen.values[i]),
        }
    }
}

/// Principal axes of the present points, or `None` if there are none.
///
/// A zero-variance input (a single point, or many copies of one) still succeeds with an
/// arbitrary orthonormal basis.
pub fn principal_axes<P: PointSet + ?Sized>(points: &P) -> Option<PrincipalAxes> {
    let cov = covariance(points)?;
    // Covariance is symmetric by construction, so the solver cannot reject it.
    let eigen = JacobiSolver::default().solve(&cov).ok()?;
    Some(PrincipalAxes::from_eigen(&eigen))
}
