// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("nodes {from} and {to} are already linked")]
    AlreadyLinked { from: usize, to: usize },
    #[error("no edge found from node {from} to node {to}")]
    NoEdgeFound { from: usize, to: usize },
    #[error("invalid node {node}: the graph has only {n_nodes} nodes")]
    InvalidNode { node: usize, n_nodes: usize },
    #[error("invalid threshold {threshold}: the number of genes to keep must be a positive number")]
    InvalidThreshold { threshold: usize },
    #[error("dataset is not compacted; call compact() before querying genotype frequencies")]
    NotCompacted,
    #[error("genotype of sample {sample} has {found} genes, but the dataset defines {expected} genes")]
    GenotypeLengthMismatch {
        sample: String,
        expected: usize,
        found: usize,
    },
    #[error("node {node} cannot be the clonal root: it is not the unmutated genotype or it has parents")]
    InvalidRoot { node: usize },
    #[error("node {node} is not connected to the clonal root")]
    DisconnectedNode { node: usize },
    #[error("dataset is empty: no sample with at least one mutated gene")]
    EmptyDataset,
    #[error("invalid {format} input at line {line}: {msg}")]
    InvalidInput {
        format: String,
        line: usize,
        msg: String,
    },
    #[error("invalid transition from state {from}: outgoing probabilities would sum up to {total}")]
    InvalidTransition { from: usize, total: f64 },
    #[error("the clonal genotype is the root of the generator and cannot be added manually")]
    ClonalGeneratorGenotype,
    #[error("too many genes ({n_genes}) for a random generator graph, at most {max} are supported")]
    TooManyGenes { n_genes: usize, max: usize },
    #[error("invalid root inflow {value}: must be a finite, non-negative number")]
    InvalidRootInflow { value: f64 },
    #[error("invalid weight {weight} for edge {from} -> {to}: must be a finite, non-negative number")]
    InvalidWeight { from: usize, to: usize, weight: f64 },
    #[error("TRaIT graph must have exactly one node without parents, found {n_roots}")]
    InvalidTraitRoot { n_roots: usize },
    #[error("TRaIT graph contains a cycle")]
    CyclicTraitGraph,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn invalid_input(format: &str, line: usize, msg: &str) -> Error {
    Error::InvalidInput {
        format: format.to_owned(),
        line,
        msg: msg.to_owned(),
    }
}
