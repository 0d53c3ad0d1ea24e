// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors shared by the Sightline crates.

use thiserror::Error;

/// Invalid input rejected by a constructor or solver.
///
/// Degenerate but valid geometry never produces an error; it is handled by the fallback
/// policies documented on each operation instead.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum Error {
    /// A strided coordinate buffer must advance at least one XYZ tuple per point.
    #[error("stride must be at least 3, got {stride}")]
    InvalidStride {
        /// The rejected stride.
        stride: usize,
    },
    /// A plane needs a non-zero normal.
    #[error("plane normal has zero length")]
    ZeroNormal,
    /// A line needs a non-zero direction.
    #[error("line direction has zero length")]
    ZeroDirection,
    /// One of the three box axes has zero length.
    #[error("axis {axis} has zero length")]
    DegenerateAxis {
        /// Index of the offending axis (0 = R, 1 = S, 2 = T).
        axis: usize,
    },
    /// The eigen solver only accepts exactly symmetric matrices.
    #[error("matrix is not symmetric")]
    NotSymmetric,
    /// A cylinder's bottom and top centers are the same point.
    #[error("cylinder endpoints coincide")]
    CoincidentEndpoints,
    /// A radius must be strictly positive.
    #[error("radius must be positive, got {radius}")]
    NonPositiveRadius {
        /// The rejected radius.
        radius: f64,
    },
    /// A projection or viewport parameter is outside its valid range.
    #[error("{name} is out of range: {value}")]
    OutOfRange {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Result alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
