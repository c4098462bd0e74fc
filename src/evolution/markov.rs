// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::constants::TRANSITION_TOLERANCE;
use crate::errors::{Error, Result};

/// Markov chain over labelled states. States are indexed in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MarkovChain {
    graph: DiGraph<String, f64>,
}

impl MarkovChain {
    pub fn add_state(&mut self, label: String) -> usize {
        self.graph.add_node(label).index()
    }

    /// Add a transition. Fails if the outgoing probabilities of `from` would
    /// exceed 1.
    pub fn add_transition(&mut self, from: usize, to: usize, probability: f64) -> Result<()> {
        for state in &[from, to] {
            if *state >= self.n_states() {
                return Err(Error::InvalidNode {
                    node: *state,
                    n_nodes: self.n_states(),
                });
            }
        }
        let total = self.outgoing_probability(from) + probability;
        if total > 1.0 + TRANSITION_TOLERANCE {
            return Err(Error::InvalidTransition { from, total });
        }
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), probability);

        Ok(())
    }

    pub fn n_states(&self) -> usize {
        self.graph.node_count()
    }

    pub fn n_transitions(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn state(&self, state: usize) -> &str {
        &self.graph[NodeIndex::new(state)]
    }

    /// Outgoing transitions of a state as (target, probability), ordered by
    /// target.
    pub fn transitions(&self, state: usize) -> Vec<(usize, f64)> {
        self.graph
            .edges(NodeIndex::new(state))
            .map(|edge| (edge.target().index(), *edge.weight()))
            .sorted_by_key(|(target, _)| *target)
            .collect()
    }

    pub fn outgoing_probability(&self, state: usize) -> f64 {
        self.graph
            .edges(NodeIndex::new(state))
            .map(|edge| *edge.weight())
            .sum()
    }
}
