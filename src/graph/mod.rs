// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use ndarray::{s, Array2};

use crate::errors::{Error, Result};

/// A directed, weighted graph backed by an adjacency matrix.
///
/// Nodes are identified by their insertion index. Besides the matrix, parent
/// and child index lists (sorted ascending) are kept for fast enumeration.
/// Self loops are allowed.
#[derive(Clone, Debug)]
pub struct DirectedGraphMatrix<T> {
    nodes: Vec<T>,
    edges: Array2<bool>,
    weights: Array2<f64>,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
}

impl<T> Default for DirectedGraphMatrix<T> {
    fn default() -> Self {
        DirectedGraphMatrix {
            nodes: Vec::new(),
            edges: Array2::default((0, 0)),
            weights: Array2::zeros((0, 0)),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl<T> DirectedGraphMatrix<T> {
    /// Create an unlinked graph over the given nodes.
    pub fn from_nodes(nodes: Vec<T>) -> Self {
        let n = nodes.len();
        DirectedGraphMatrix {
            nodes,
            edges: Array2::default((n, n)),
            weights: Array2::zeros((n, n)),
            parents: vec![Vec::new(); n],
            children: vec![Vec::new(); n],
        }
    }

    /// Add a node and return its index. This reallocates the matrices.
    pub fn add(&mut self, content: T) -> usize {
        let n = self.nodes.len();

        let mut edges = Array2::default((n + 1, n + 1));
        edges.slice_mut(s![..n, ..n]).assign(&self.edges);
        self.edges = edges;

        let mut weights = Array2::zeros((n + 1, n + 1));
        weights.slice_mut(s![..n, ..n]).assign(&self.weights);
        self.weights = weights;

        self.nodes.push(content);
        self.parents.push(Vec::new());
        self.children.push(Vec::new());

        n
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.nodes.len() {
            Err(Error::InvalidNode {
                node,
                n_nodes: self.nodes.len(),
            })
        } else {
            Ok(())
        }
    }

    fn check_edge(&self, from: usize, to: usize) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        if self.edges[[from, to]] {
            Ok(())
        } else {
            Err(Error::NoEdgeFound { from, to })
        }
    }

    /// Add an edge from `from` to `to` with weight 0.
    pub fn link(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        if self.edges[[from, to]] {
            return Err(Error::AlreadyLinked { from, to });
        }
        self.edges[[from, to]] = true;
        insert_sorted(&mut self.children[from], to);
        insert_sorted(&mut self.parents[to], from);

        Ok(())
    }

    pub fn link_weighted(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        self.link(from, to)?;
        self.set_weight(from, to, weight)
    }

    pub fn unlink(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_edge(from, to)?;
        self.edges[[from, to]] = false;
        self.weights[[from, to]] = 0.0;
        self.children[from].retain(|child| *child != to);
        self.parents[to].retain(|parent| *parent != from);

        Ok(())
    }

    pub fn is_linked(&self, from: usize, to: usize) -> bool {
        from < self.nodes.len() && to < self.nodes.len() && self.edges[[from, to]]
    }

    pub fn set_weight(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        self.check_edge(from, to)?;
        self.weights[[from, to]] = weight;
        Ok(())
    }

    pub fn weight(&self, from: usize, to: usize) -> Result<f64> {
        self.check_edge(from, to)?;
        Ok(self.weights[[from, to]])
    }

    /// Copy the weights of all existing edges from the given matrix.
    pub fn set_weights(&mut self, weights: &Array2<f64>) {
        assert_eq!(
            weights.dim(),
            self.edges.dim(),
            "bug: weight matrix does not match graph size"
        );
        for (from, children) in self.children.iter().enumerate() {
            for to in children {
                self.weights[[from, *to]] = weights[[from, *to]];
            }
        }
    }

    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn node(&self, node: usize) -> &T {
        &self.nodes[node]
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_edges(&self) -> usize {
        self.children.iter().map(|children| children.len()).sum()
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        &self.parents[node]
    }

    pub fn n_children(&self, node: usize) -> usize {
        self.children[node].len()
    }

    pub fn n_parents(&self, node: usize) -> usize {
        self.parents[node].len()
    }

    /// All edges as (from, to, weight), ordered by source and target index.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.children.iter().enumerate().flat_map(move |(from, children)| {
            children
                .iter()
                .map(move |to| (from, *to, self.weights[[from, *to]]))
        })
    }
}

fn insert_sorted(list: &mut Vec<usize>, value: usize) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}
