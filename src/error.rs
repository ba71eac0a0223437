// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use thiserror::Error;

/// Errors returned by channel and image operations.
///
/// Every variant is fatal to the operation that produced it.
/// Operations are deterministic, so retrying with unchanged input
/// reproduces the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero-sized grid, or dimensions that disagree with each other.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Order, shuffle or start node cannot describe a permutation
    /// of the grid.
    #[error("permutation mismatch: {0}")]
    PermutationMismatch(String),

    /// Key material too short to take a seed from.
    #[error("seed derivation needs at least {needed} bytes, got {got}")]
    SeedDerivationFailure { needed: usize, got: usize },

    /// Password rejected by the strength policy.
    #[error("weak password: {0}")]
    WeakPassword(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejects a grid with a zero dimension.
pub(crate) fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions(format!(
            "grid must be at least 1x1, got {rows}x{cols}"
        )));
    }
    Ok(())
}
