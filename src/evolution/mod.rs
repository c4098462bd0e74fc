// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Genotype graphs: a DAG over the observed genotypes of a dataset, rooted at
//! the clonal (unmutated) genotype, with an edge from each genotype to the
//! genotypes that can evolve from it by acquiring further mutations.

pub mod config;
pub mod linking;
pub mod markov;
pub mod steady_state;
pub mod weights;

use itertools::Itertools;

use crate::constants::CLONAL_LABEL;
use crate::dataset::Dataset;
use crate::errors::{Error, Result};
use crate::genotype::Genotype;
use crate::graph::DirectedGraphMatrix;

pub use self::config::EngineConfig;
pub use self::linking::{LinkingStrategy, ROOT};
pub use self::markov::MarkovChain;
pub use self::steady_state::SteadyState;
pub use self::weights::{WeightEngine, WeightTables};

/// Node content of a genotype graph.
#[derive(Clone, Debug, PartialEq, Getters, new)]
#[getset(get = "pub")]
pub struct GenotypeInfo {
    genotype: Genotype,
    /// Mutated genes as `[A, C]`, or `clonal` for the root.
    label: String,
    observed_probability: f64,
    frequency: usize,
    samples: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GenotypeGraph {
    graph: DirectedGraphMatrix<GenotypeInfo>,
    weights: WeightTables,
    steady_state: SteadyState,
    labels: Vec<String>,
}

impl GenotypeGraph {
    /// Build the graph of a compacted dataset and compute all weights.
    pub fn new(dataset: &Dataset, config: &EngineConfig) -> Result<Self> {
        if !dataset.is_compacted() {
            return Err(Error::NotCompacted);
        }
        if dataset.n_genotypes() == 0 {
            return Err(Error::EmptyDataset);
        }

        let mut nodes = Vec::with_capacity(dataset.n_genotypes() + 1);
        nodes.push(GenotypeInfo::new(
            Genotype::clonal(dataset.n_genes()),
            CLONAL_LABEL.to_owned(),
            0.0,
            0,
            Vec::new(),
        ));
        for (i, entry) in dataset.entries().iter().enumerate() {
            nodes.push(GenotypeInfo::new(
                entry.genotype().clone(),
                entry.genotype().describe(dataset.labels()),
                dataset.normalized_frequency_of(i)?,
                *entry.frequency(),
                entry.samples().clone(),
            ));
        }

        let genotypes = nodes.iter().map(|node| node.genotype.clone()).collect_vec();
        let mut graph = DirectedGraphMatrix::from_nodes(nodes);
        for node in 1..genotypes.len() {
            for parent in config.linking.parents(&genotypes, node) {
                graph.link(parent, node)?;
            }
        }
        info!(
            "Built genotype graph with {} nodes and {} edges.",
            graph.n_nodes(),
            graph.n_edges()
        );

        let observed = graph
            .nodes()
            .iter()
            .map(|node| node.observed_probability)
            .collect_vec();
        let weights = WeightEngine::new(&graph, &observed, config.root_inflow).compute()?;
        graph.set_weights(weights.transitions());
        let steady_state = SteadyState::compute(&graph)?;

        Ok(GenotypeGraph {
            graph,
            weights,
            steady_state,
            labels: dataset.labels().to_vec(),
        })
    }

    pub fn graph(&self) -> &DirectedGraphMatrix<GenotypeInfo> {
        &self.graph
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.n_nodes()
    }

    pub fn n_edges(&self) -> usize {
        self.graph.n_edges()
    }

    pub fn node(&self, node: usize) -> &GenotypeInfo {
        self.graph.node(node)
    }

    pub fn nodes(&self) -> &[GenotypeInfo] {
        self.graph.nodes()
    }

    /// Index of the node holding the given genotype.
    pub fn find(&self, genotype: &Genotype) -> Option<usize> {
        self.nodes()
            .iter()
            .position(|node| node.genotype() == genotype)
    }

    pub fn children(&self, node: usize) -> &[usize] {
        self.graph.children(node)
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        self.graph.parents(node)
    }

    /// Edges as (from, to, transition probability).
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph.edges()
    }

    pub fn transition(&self, from: usize, to: usize) -> Result<f64> {
        self.graph.weight(from, to)
    }

    pub fn weights(&self) -> &WeightTables {
        &self.weights
    }

    pub fn steady_state(&self) -> &SteadyState {
        &self.steady_state
    }

    /// Gene labels of the underlying dataset.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Project the graph onto a Markov chain whose states only carry the node
    /// labels.
    pub fn markov_chain(&self) -> Result<MarkovChain> {
        let mut chain = MarkovChain::default();
        for node in self.nodes() {
            chain.add_state(node.label.clone());
        }
        for (from, to, weight) in self.edges() {
            chain.add_transition(from, to, weight)?;
        }
        Ok(chain)
    }
}
