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

use log::warn;

use crate::error::{Error, Result};
use crate::mst::SpanningTree;

/// Depth-first visit order of `tree` starting at `start`.
///
/// Uses an explicit stack, so image size is not limited by call depth.
/// Neighbors are visited in their stored order. Nodes unreachable from
/// `start` are appended in ascending order, so the result is always a
/// permutation of `0..tree.node_count()`.
pub fn dfs_order(tree: &SpanningTree, start: usize) -> Result<Vec<usize>> {
    let size = tree.node_count();
    if start >= size {
        return Err(Error::PermutationMismatch(format!(
            "start node {start} out of range for {size} nodes"
        )));
    }

    let mut visited = vec![false; size];
    let mut order = Vec::with_capacity(size);
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);

        // Reversed so the first stored neighbor is popped first
        stack.extend(
            tree.neighbors(node)
                .iter()
                .rev()
                .map(|&(n, _)| n)
                .filter(|&n| !visited[n]),
        );
    }

    if order.len() < size {
        warn!(
            "traversal reached {} of {} nodes, appending the rest",
            order.len(),
            size
        );
        order.extend((0..size).filter(|&n| !visited[n]));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use ndarray::prelude::*;

    use super::*;
    use crate::graph::{grid_edges, Edge};
    use crate::mst::spanning_tree;

    fn uniform_2x2() -> SpanningTree {
        let ch = array![[5u8, 5], [5, 5]];
        spanning_tree(grid_edges(ch.view()).unwrap(), 4).unwrap()
    }

    #[test]
    fn pinned_order_for_uniform_block() {
        let t = uniform_2x2();
        assert_eq!(dfs_order(&t, 0).unwrap(), [0, 1, 3, 2]);
        assert_eq!(dfs_order(&t, 3).unwrap(), [3, 1, 0, 2]);
        assert_eq!(dfs_order(&t, 2).unwrap(), [2, 0, 1, 3]);
    }

    #[test]
    fn order_is_permutation() {
        let ch = Array2::from_shape_fn((20, 30), |(i, j)| ((i * j) % 251) as u8);
        let t = spanning_tree(grid_edges(ch.view()).unwrap(), 600).unwrap();
        let mut order = dfs_order(&t, 123).unwrap();
        assert_eq!(order[0], 123);
        order.sort_unstable();
        assert!(order.iter().copied().eq(0..600));
    }

    #[test]
    fn unreachable_nodes_appended() {
        let edges = vec![Edge {
            u: 1,
            v: 3,
            weight: 0,
        }];
        let t = spanning_tree(edges, 5).unwrap();
        assert_eq!(dfs_order(&t, 3).unwrap(), [3, 1, 0, 2, 4]);
    }

    #[test]
    fn large_strip_does_not_overflow() {
        let ch = Array2::<u8>::zeros((1, 200_000));
        let t = spanning_tree(grid_edges(ch.view()).unwrap(), 200_000).unwrap();
        let order = dfs_order(&t, 0).unwrap();
        assert!(order.iter().copied().eq(0..200_000));
    }

    #[test]
    fn start_out_of_range() {
        let t = uniform_2x2();
        assert!(matches!(
            dfs_order(&t, 4),
            Err(Error::PermutationMismatch(_))
        ));
    }
}
