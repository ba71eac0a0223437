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

use ndarray::prelude::*;

use crate::error::{check_dimensions, Result};

/// Weighted edge between two grid cells.
///
/// Nodes are linear indices (`row * cols + col`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    /// Absolute intensity difference of the two cells.
    pub weight: u8,
}

/// Builds the 4-neighborhood edge list of a channel.
///
/// Cells are visited in row-major order, and for each cell the edge
/// to the right neighbor is emitted before the edge to the one below.
/// [`spanning_tree`](crate::mst::spanning_tree) relies on this order
/// to break weight ties.
pub fn grid_edges(channel: ArrayView2<'_, u8>) -> Result<Vec<Edge>> {
    let (rows, cols) = channel.dim();
    check_dimensions(rows, cols)?;

    let mut edges = Vec::with_capacity(rows * (cols - 1) + (rows - 1) * cols);
    for i in 0..rows {
        for j in 0..cols {
            let idx = i * cols + j;
            let val = channel[[i, j]];
            if j + 1 < cols {
                edges.push(Edge {
                    u: idx,
                    v: idx + 1,
                    weight: val.abs_diff(channel[[i, j + 1]]),
                });
            }
            if i + 1 < rows {
                edges.push(Edge {
                    u: idx,
                    v: idx + cols,
                    weight: val.abs_diff(channel[[i + 1, j]]),
                });
            }
        }
    }

    Ok(edges)
}
