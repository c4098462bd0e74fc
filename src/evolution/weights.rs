// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Edge weights of a genotype graph.
//!
//! Weights are computed in two passes. The up pass distributes the probability
//! mass flowing in from the root, topologically from the root towards the
//! leaves. Each node forwards its inflow plus its own observed probability in
//! equal parts to its children. Normalizing the incoming up-weights of a node
//! yields the share each parent contributes to it.
//!
//! The down pass then runs from the leaves towards the root. Each node sends
//! the mass observed in its subtree (its own observed probability plus the
//! down-weights of its outgoing edges) to its parents, split by those shares.
//! Normalizing the outgoing down-weights of a node gives the final transition
//! probabilities.

use std::collections::VecDeque;

use itertools::Itertools;
use ndarray::Array2;

use crate::errors::{Error, Result};
use crate::evolution::linking::ROOT;
use crate::graph::DirectedGraphMatrix;

/// Per-edge weights of all passes, indexed by `[from, to]`.
#[derive(Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct WeightTables {
    up: Array2<f64>,
    up_normalized: Array2<f64>,
    down: Array2<f64>,
    transitions: Array2<f64>,
}

#[derive(new)]
pub struct WeightEngine<'a, T> {
    graph: &'a DirectedGraphMatrix<T>,
    /// Observed probability per node.
    observed: &'a [f64],
    root_inflow: f64,
}

impl<'a, T> WeightEngine<'a, T> {
    pub fn compute(&self) -> Result<WeightTables> {
        assert_eq!(
            self.observed.len(),
            self.graph.n_nodes(),
            "bug: observed probabilities do not match graph"
        );
        if !self.root_inflow.is_finite() || self.root_inflow < 0.0 {
            return Err(Error::InvalidRootInflow {
                value: self.root_inflow,
            });
        }
        if self.graph.n_parents(ROOT) > 0 {
            return Err(Error::InvalidRoot { node: ROOT });
        }

        let up = self.up_weights()?;
        let up_normalized = self.normalize_incoming(&up);
        let down = self.down_weights(&up_normalized)?;
        let transitions = self.normalize_outgoing(&down);

        Ok(WeightTables {
            up,
            up_normalized,
            down,
            transitions,
        })
    }

    fn up_weights(&self) -> Result<Array2<f64>> {
        let n = self.graph.n_nodes();
        let mut up = Array2::zeros((n, n));
        let mut inflow = vec![0.0; n];
        let mut pending = (0..n).map(|node| self.graph.n_parents(node)).collect_vec();
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);

        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            let total = if node == ROOT {
                self.root_inflow
            } else {
                inflow[node] + self.observed[node]
            };
            let children = self.graph.children(node);
            let weight = if total > 0.0 && !children.is_empty() {
                total / children.len() as f64
            } else {
                0.0
            };
            debug!(
                "up pass: node {} forwards {} to each of {} children",
                node,
                weight,
                children.len()
            );

            for &child in children {
                up[[node, child]] = weight;
                inflow[child] += weight;
                pending[child] -= 1;
                if pending[child] == 0 {
                    queue.push_back(child);
                }
            }
        }
        if visited < n {
            return Err(unvisited(&pending));
        }

        Ok(up)
    }

    fn normalize_incoming(&self, up: &Array2<f64>) -> Array2<f64> {
        let n = self.graph.n_nodes();
        let mut normalized = Array2::zeros((n, n));
        for node in 0..n {
            let parents = self.graph.parents(node);
            if parents.is_empty() {
                continue;
            }
            let total: f64 = parents.iter().map(|&parent| up[[parent, node]]).sum();
            if total > 0.0 {
                for &parent in parents {
                    normalized[[parent, node]] = up[[parent, node]] / total;
                }
            } else if self.graph.is_linked(ROOT, node) {
                normalized[[ROOT, node]] = 1.0;
            } else {
                let share = 1.0 / parents.len() as f64;
                for &parent in parents {
                    normalized[[parent, node]] = share;
                }
            }
        }
        normalized
    }

    fn down_weights(&self, up_normalized: &Array2<f64>) -> Result<Array2<f64>> {
        let n = self.graph.n_nodes();
        let mut down = Array2::zeros((n, n));
        let mut outflow = vec![0.0; n];
        let mut pending = (0..n).map(|node| self.graph.n_children(node)).collect_vec();
        let mut queue = (0..n).filter(|node| pending[*node] == 0).collect::<VecDeque<_>>();

        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            let total = outflow[node] + if node == ROOT { 0.0 } else { self.observed[node] };
            debug!("down pass: node {} sends {} to its parents", node, total);

            for &parent in self.graph.parents(node) {
                let weight = total * up_normalized[[parent, node]];
                down[[parent, node]] = weight;
                outflow[parent] += weight;
                pending[parent] -= 1;
                if pending[parent] == 0 {
                    queue.push_back(parent);
                }
            }
        }
        if visited < n {
            return Err(unvisited(&pending));
        }

        Ok(down)
    }

    fn normalize_outgoing(&self, down: &Array2<f64>) -> Array2<f64> {
        let n = self.graph.n_nodes();
        let mut transitions = Array2::zeros((n, n));
        for node in 0..n {
            let children = self.graph.children(node);
            if children.is_empty() {
                continue;
            }
            let total: f64 = children.iter().map(|&child| down[[node, child]]).sum();
            if total > 0.0 {
                for &child in children {
                    transitions[[node, child]] = down[[node, child]] / total;
                }
            } else {
                warn!(
                    "No probability mass leaves node {}, splitting its transitions uniformly.",
                    node
                );
                let share = 1.0 / children.len() as f64;
                for &child in children {
                    transitions[[node, child]] = share;
                }
            }
        }
        transitions
    }
}

/// Error for the first node whose in- or out-edges were not all processed.
pub(crate) fn unvisited(pending: &[usize]) -> Error {
    let node = pending
        .iter()
        .position(|remaining| *remaining > 0)
        .unwrap_or(ROOT);
    Error::DisconnectedNode { node }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root, A, B, AB with A -> AB and B -> AB.
    fn confluence() -> (DirectedGraphMatrix<&'static str>, Vec<f64>) {
        let mut graph = DirectedGraphMatrix::from_nodes(vec!["root", "A", "B", "AB"]);
        graph.link(0, 1).unwrap();
        graph.link(0, 2).unwrap();
        graph.link(1, 3).unwrap();
        graph.link(2, 3).unwrap();
        (graph, vec![0.0, 0.5, 0.25, 0.25])
    }

    #[test]
    fn test_confluence() {
        let (graph, observed) = confluence();
        let weights = WeightEngine::new(&graph, &observed, 1.0).compute().unwrap();

        assert_relative_eq!(weights.up()[[0, 1]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(weights.up()[[1, 3]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(weights.up()[[2, 3]], 0.75, epsilon = 1e-12);
        assert_relative_eq!(weights.up_normalized()[[1, 3]], 4.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(weights.up_normalized()[[2, 3]], 3.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(weights.down()[[1, 3]], 1.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[0, 1]], 9.0 / 14.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[0, 2]], 5.0 / 14.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[1, 3]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[2, 3]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_root_inflow() {
        let (graph, observed) = confluence();
        let weights = WeightEngine::new(&graph, &observed, 0.0).compute().unwrap();

        // no up mass reaches A and B, the root edges are forced to 1
        assert_relative_eq!(weights.up()[[0, 1]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(weights.up_normalized()[[0, 1]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(weights.up_normalized()[[1, 3]], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[0, 1]], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[0, 2]], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_split_without_mass() {
        let mut graph = DirectedGraphMatrix::from_nodes(vec!["root", "A", "B"]);
        graph.link(0, 1).unwrap();
        graph.link(0, 2).unwrap();
        let weights = WeightEngine::new(&graph, &[0.0, 0.0, 0.0], 1.0)
            .compute()
            .unwrap();
        assert_relative_eq!(weights.transitions()[[0, 1]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(weights.transitions()[[0, 2]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_root_inflow() {
        let (graph, observed) = confluence();
        for value in &[f64::INFINITY, -1.0] {
            assert_eq!(
                WeightEngine::new(&graph, &observed, *value)
                    .compute()
                    .unwrap_err(),
                Error::InvalidRootInflow { value: *value }
            );
        }
        match WeightEngine::new(&graph, &observed, f64::NAN).compute() {
            Err(Error::InvalidRootInflow { value }) => assert!(value.is_nan()),
            result => panic!("unexpected result {:?}", result),
        }
    }

    #[test]
    fn test_invalid_root() {
        let mut graph = DirectedGraphMatrix::from_nodes(vec!["root", "A"]);
        graph.link(1, 0).unwrap();
        let err = WeightEngine::new(&graph, &[0.0, 1.0], 1.0).compute().unwrap_err();
        assert_eq!(err, Error::InvalidRoot { node: 0 });
    }

    #[test]
    fn test_disconnected_node() {
        let mut graph = DirectedGraphMatrix::from_nodes(vec!["root", "A", "B"]);
        graph.link(0, 1).unwrap();
        graph.link(2, 2).unwrap();
        let err = WeightEngine::new(&graph, &[0.0, 0.5, 0.5], 1.0)
            .compute()
            .unwrap_err();
        assert_eq!(err, Error::DisconnectedNode { node: 2 });
    }
}
