// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Mutation graphs as inferred by TRaIT (one node per gene, weighted edges
//! between mutations) and their expansion into Markov chains.

use itertools::Itertools;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::constants::CLONAL_LABEL;
use crate::errors::{Error, Result};
use crate::evolution::MarkovChain;

/// Weighted DAG over gene labelled nodes. Exactly one node (the root) has no
/// parents; its label is not part of any path.
#[derive(Clone, Debug, Default)]
pub struct TraitGraph {
    graph: DiGraph<String, f64>,
}

impl TraitGraph {
    pub fn add_node(&mut self, label: String) -> usize {
        self.graph.add_node(label).index()
    }

    /// Add a weighted edge. Weights are relative; they are normalized per node
    /// when building the Markov chain.
    pub fn add(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        for node in &[from, to] {
            if *node >= self.n_nodes() {
                return Err(Error::InvalidNode {
                    node: *node,
                    n_nodes: self.n_nodes(),
                });
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { from, to, weight });
        }
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), weight);

        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn n_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn label(&self, node: usize) -> &str {
        &self.graph[NodeIndex::new(node)]
    }

    /// Children of a node with their edge weights, in insertion order.
    pub fn children(&self, node: usize) -> Vec<(usize, f64)> {
        self.graph
            .edges(NodeIndex::new(node))
            .sorted_by_key(|edge| edge.id())
            .map(|edge| (edge.target().index(), *edge.weight()))
            .collect()
    }

    pub fn root(&self) -> Result<usize> {
        let roots = self
            .graph
            .externals(Direction::Incoming)
            .map(|node| node.index())
            .collect_vec();
        match roots.as_slice() {
            [root] => Ok(*root),
            _ => Err(Error::InvalidTraitRoot {
                n_roots: roots.len(),
            }),
        }
    }

    /// Expand every path from the root into a Markov state labelled with the
    /// genes collected along it. A state moves to the states of its node's
    /// children with the node's edge weights normalized to 1. States are
    /// numbered in depth-first pre-order, children in insertion order.
    pub fn markov_chain(&self) -> Result<MarkovChain> {
        if is_cyclic_directed(&self.graph) {
            return Err(Error::CyclicTraitGraph);
        }
        let root = self.root()?;

        let mut chain = MarkovChain::default();
        let mut stack: Vec<(usize, Vec<&str>, Option<(usize, f64)>)> =
            vec![(root, Vec::new(), None)];
        while let Some((node, path, predecessor)) = stack.pop() {
            let label = if path.is_empty() {
                CLONAL_LABEL.to_owned()
            } else {
                format!("[{}]", path.join(", "))
            };
            let state = chain.add_state(label);
            if let Some((from, probability)) = predecessor {
                chain.add_transition(from, state, probability)?;
            }

            let children = self.children(node);
            let n_children = children.len();
            let total: f64 = children.iter().map(|(_, weight)| weight).sum();
            if n_children > 0 && total <= 0.0 {
                warn!(
                    "Outgoing weights of TRaIT node {} sum up to zero, splitting uniformly.",
                    self.label(node)
                );
            }
            // pushed in reverse, popped in insertion order
            for (child, weight) in children.into_iter().rev() {
                let probability = if total > 0.0 {
                    weight / total
                } else {
                    1.0 / n_children as f64
                };
                let mut child_path = path.clone();
                child_path.push(self.label(child));
                stack.push((child, child_path, Some((state, probability))));
            }
        }
        debug!(
            "Expanded TRaIT graph with {} nodes into a Markov chain with {} states.",
            self.n_nodes(),
            chain.n_states()
        );

        Ok(chain)
    }
}
