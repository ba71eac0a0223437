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

use crate::error::{Error, Result};
use crate::graph::Edge;

/// Disjoint-set forest with path halving and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `x` and `y`.
    /// Returns `false` if they were already in the same set.
    fn union(&mut self, x: usize, y: usize) -> bool {
        let (x, y) = (self.find(x), self.find(y));
        if x == y {
            return false;
        }

        if self.rank[x] < self.rank[y] {
            self.parent[x] = y;
        } else {
            self.parent[y] = x;
            if self.rank[x] == self.rank[y] {
                self.rank[x] += 1;
            }
        }
        true
    }
}

/// Minimum spanning tree stored as an adjacency list.
///
/// Each node's neighbor list holds `(neighbor, weight)` in the order
/// the edges were accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    adjacency: Vec<Vec<(usize, u8)>>,
    edge_count: usize,
}

impl SpanningTree {
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of accepted edges. A spanning tree has `node_count - 1`.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn neighbors(&self, node: usize) -> &[(usize, u8)] {
        &self.adjacency[node]
    }
}

/// Kruskal's algorithm over `edges` with `nodes` vertices.
///
/// Edges are sorted by weight with a stable sort, so equal weights keep
/// their emission order and the same input always gives the same tree.
pub fn spanning_tree(mut edges: Vec<Edge>, nodes: usize) -> Result<SpanningTree> {
    if let Some(e) = edges.iter().find(|e| e.u >= nodes || e.v >= nodes) {
        return Err(Error::InvalidDimensions(format!(
            "edge ({}, {}) out of range for {} nodes",
            e.u, e.v, nodes
        )));
    }

    edges.sort_by_key(|e| e.weight);

    let mut sets = UnionFind::new(nodes);
    let mut adjacency = vec![Vec::new(); nodes];
    let mut edge_count = 0;
    for Edge { u, v, weight } in edges {
        if sets.union(u, v) {
            adjacency[u].push((v, weight));
            adjacency[v].push((u, weight));
            edge_count += 1;
        }
    }

    Ok(SpanningTree {
        adjacency,
        edge_count,
    })
}
