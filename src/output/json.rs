// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io::Write;

use anyhow::Result;

use crate::evolution::GenotypeGraph;

#[derive(Debug, Serialize)]
struct Node<'a> {
    id: usize,
    label: &'a str,
    genotype: Vec<usize>,
    frequency: usize,
    observed_probability: f64,
    samples: &'a [String],
    visit_probability: f64,
    steady_state: f64,
}

#[derive(Debug, Serialize)]
struct Edge {
    from: usize,
    to: usize,
    probability: f64,
}

#[derive(Debug, Serialize)]
struct Graph<'a> {
    genes: &'a [String],
    nodes: Vec<Node<'a>>,
    edges: Vec<Edge>,
}

/// Nodes (with the indices of their mutated genes) and weighted edges as a
/// JSON document.
pub fn genotype_graph<W: Write>(graph: &GenotypeGraph, mut out: W) -> Result<()> {
    let steady_state = graph.steady_state();
    let document = Graph {
        genes: graph.labels(),
        nodes: graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, info)| Node {
                id,
                label: info.label(),
                genotype: info.genotype().mutated_genes().collect(),
                frequency: *info.frequency(),
                observed_probability: *info.observed_probability(),
                samples: info.samples(),
                visit_probability: steady_state.visits()[id],
                steady_state: steady_state.get(id),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(from, to, probability)| Edge {
                from,
                to,
                probability,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut out, &document)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
