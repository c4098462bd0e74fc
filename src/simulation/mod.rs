// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Synthetic datasets from a known generator graph.
//!
//! A generator graph links genotypes with arbitrary positive weights, self
//! loops included. Samples are obtained by random walks of a fixed length
//! starting at the clonal root, the reached genotype being the sample's
//! mutational profile.

use itertools::Itertools;
use rand::distributions::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{MAX_RANDOM_GENERATOR_GENES, SAMPLE_PREFIX};
use crate::dataset::Dataset;
use crate::errors::{Error, Result};
use crate::evolution::linking::{LinkingStrategy, ROOT};
use crate::genotype::Genotype;
use crate::graph::DirectedGraphMatrix;

#[derive(Clone, Debug)]
pub struct GeneratorGraph {
    graph: DirectedGraphMatrix<Genotype>,
    labels: Vec<String>,
}

impl GeneratorGraph {
    /// Create a generator holding only the clonal root.
    pub fn new(labels: Vec<String>) -> Self {
        let mut graph = DirectedGraphMatrix::default();
        graph.add(Genotype::clonal(labels.len()));
        GeneratorGraph { graph, labels }
    }

    /// Create a random generator over genes `G0`, `G1`, ...
    ///
    /// Each mutated genotype is included with probability
    /// `1 / mutation count`. Every node receives a self loop and edges from
    /// its closest subset ancestors, all with uniformly drawn weights.
    pub fn random<R: Rng>(n_genes: usize, rng: &mut R) -> Result<Self> {
        if n_genes > MAX_RANDOM_GENERATOR_GENES {
            return Err(Error::TooManyGenes {
                n_genes,
                max: MAX_RANDOM_GENERATOR_GENES,
            });
        }
        let labels = (0..n_genes).map(|gene| format!("G{}", gene)).collect_vec();

        let mut genotypes = vec![Genotype::clonal(n_genes)];
        for code in 1..1usize << n_genes {
            // most significant bit first
            let genotype = (0..n_genes)
                .map(|gene| (code >> (n_genes - 1 - gene)) & 1 == 1)
                .collect::<Genotype>();
            if rng.gen::<f64>() < 1.0 / genotype.mutation_count() as f64 {
                genotypes.push(genotype);
            }
        }
        genotypes.sort();

        let weights = Uniform::new(0.0, 1.0);
        let mut generator = GeneratorGraph {
            graph: DirectedGraphMatrix::from_nodes(genotypes.clone()),
            labels,
        };
        for node in 0..genotypes.len() {
            generator.link(node, node, weights.sample(rng))?;
            for parent in LinkingStrategy::MinimalDistance.parents(&genotypes, node) {
                generator.link(parent, node, weights.sample(rng))?;
            }
        }
        info!(
            "Generated random generator graph with {} genotypes over {} genes.",
            generator.n_nodes(),
            n_genes
        );

        Ok(generator)
    }

    /// Add a mutated genotype and return its node index.
    pub fn add(&mut self, genotype: Genotype) -> Result<usize> {
        if genotype.len() != self.labels.len() {
            return Err(Error::GenotypeLengthMismatch {
                sample: genotype.to_string(),
                expected: self.labels.len(),
                found: genotype.len(),
            });
        }
        if genotype.is_clonal() {
            return Err(Error::ClonalGeneratorGenotype);
        }
        Ok(self.graph.add(genotype))
    }

    /// Link two nodes. Self loops are allowed.
    pub fn link(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        self.graph.link_weighted(from, to, weight)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.n_nodes()
    }

    pub fn genotype(&self, node: usize) -> &Genotype {
        self.graph.node(node)
    }

    pub fn graph(&self) -> &DirectedGraphMatrix<Genotype> {
        &self.graph
    }

    /// Outgoing edges of a node as (target, probability), the weights
    /// normalized to sum up to 1. Without any weight, targets are equally
    /// likely.
    pub fn transition_probabilities(&self, node: usize) -> Vec<(usize, f64)> {
        let children = self.graph.children(node);
        let weights = children
            .iter()
            .map(|&child| self.graph.weight(node, child).unwrap_or(0.0))
            .collect_vec();
        let total: f64 = weights.iter().sum();
        children
            .iter()
            .zip(weights)
            .map(|(&child, weight)| {
                if total > 0.0 {
                    (child, weight / total)
                } else {
                    (child, 1.0 / children.len() as f64)
                }
            })
            .collect()
    }

    /// Random walk of `path_length` steps from the root. The walk ends early
    /// at nodes without outgoing edges.
    pub fn simulate<R: Rng>(&self, path_length: usize, rng: &mut R) -> &Genotype {
        let mut position = ROOT;
        for _ in 0..path_length {
            let transitions = self.transition_probabilities(position);
            match transitions.choose_weighted(rng, |(_, probability)| *probability) {
                Ok((next, _)) => position = *next,
                Err(_) => break,
            }
        }
        self.genotype(position)
    }

    /// Compacted dataset of `n_samples` simulated samples named `s_1`, ...
    /// Samples ending in the clonal genotype are dropped by the dataset.
    pub fn generate<R: Rng>(
        &self,
        n_samples: usize,
        path_length: usize,
        rng: &mut R,
    ) -> Result<Dataset> {
        let samples = (0..n_samples)
            .map(|i| {
                (
                    format!("{}{}", SAMPLE_PREFIX, i + 1),
                    self.simulate(path_length, rng).clone(),
                )
            })
            .collect_vec();
        let mut dataset = Dataset::new(self.labels.clone(), samples)?;
        dataset.compact();

        Ok(dataset)
    }

    /// Advance a node distribution by one step of the walk.
    pub fn step(&self, distribution: &[f64]) -> Vec<f64> {
        assert_eq!(
            distribution.len(),
            self.n_nodes(),
            "bug: distribution does not match generator"
        );
        let mut next = vec![0.0; self.n_nodes()];
        for (node, mass) in distribution.iter().enumerate() {
            let transitions = self.transition_probabilities(node);
            if transitions.is_empty() {
                next[node] += mass;
            }
            for (child, probability) in transitions {
                next[child] += mass * probability;
            }
        }
        next
    }

    /// Exact distribution over nodes after the given number of steps.
    pub fn distribution_after(&self, steps: usize) -> Vec<f64> {
        let mut distribution = vec![0.0; self.n_nodes()];
        distribution[ROOT] = 1.0;
        for _ in 0..steps {
            distribution = self.step(&distribution);
        }
        distribution
    }
}
