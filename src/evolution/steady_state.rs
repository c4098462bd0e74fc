// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::VecDeque;

use itertools::Itertools;

use crate::errors::{Error, Result};
use crate::evolution::linking::ROOT;
use crate::evolution::weights::unvisited;
use crate::graph::DirectedGraphMatrix;

/// Long run distribution of a walk starting at the clonal root and following
/// the transition weights until it reaches a leaf.
#[derive(Clone, Debug, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct SteadyState {
    /// Probability of passing through each node.
    visits: Vec<f64>,
    /// Probability of ending in each node. Only leaves absorb mass.
    absorbed: Vec<f64>,
}

impl SteadyState {
    /// Propagate the unit mass of the root along the edge weights of the
    /// given DAG.
    pub fn compute<T>(graph: &DirectedGraphMatrix<T>) -> Result<Self> {
        let n = graph.n_nodes();
        let mut visits = vec![0.0; n];
        let mut absorbed = vec![0.0; n];
        let mut pending = (0..n).map(|node| graph.n_parents(node)).collect_vec();
        if pending[ROOT] > 0 {
            return Err(Error::InvalidRoot { node: ROOT });
        }

        visits[ROOT] = 1.0;
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            let children = graph.children(node);
            if children.is_empty() {
                absorbed[node] = visits[node];
            }
            for &child in children {
                visits[child] += visits[node] * graph.weight(node, child)?;
                pending[child] -= 1;
                if pending[child] == 0 {
                    queue.push_back(child);
                }
            }
        }
        if visited < n {
            return Err(unvisited(&pending));
        }

        Ok(SteadyState { visits, absorbed })
    }

    pub fn get(&self, node: usize) -> f64 {
        self.absorbed[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_ends_in_leaves() {
        let mut graph = DirectedGraphMatrix::from_nodes(vec!["root", "A", "B", "AB", "AC"]);
        graph.link_weighted(0, 1, 0.6).unwrap();
        graph.link_weighted(0, 2, 0.4).unwrap();
        graph.link_weighted(1, 3, 0.5).unwrap();
        graph.link_weighted(1, 4, 0.5).unwrap();
        graph.link_weighted(2, 3, 1.0).unwrap();

        let steady_state = SteadyState::compute(&graph).unwrap();
        assert_relative_eq!(steady_state.visits()[1], 0.6, epsilon = 1e-12);
        assert_relative_eq!(steady_state.visits()[3], 0.7, epsilon = 1e-12);
        assert_relative_eq!(steady_state.get(0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(steady_state.get(1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(steady_state.get(3), 0.7, epsilon = 1e-12);
        assert_relative_eq!(steady_state.get(4), 0.3, epsilon = 1e-12);
        assert_relative_eq!(steady_state.absorbed().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_root() {
        let graph = DirectedGraphMatrix::from_nodes(vec!["root"]);
        let steady_state = SteadyState::compute(&graph).unwrap();
        assert_eq!(steady_state.absorbed(), &vec![1.0]);
    }
}
