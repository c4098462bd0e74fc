// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Graphviz dot rendering of genotype graphs, Markov chains, TRaIT graphs and
//! generators.

use std::io::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::evolution::{GenotypeGraph, MarkovChain};
use crate::simulation::GeneratorGraph;
use crate::trait_graph::TraitGraph;

/// What to show in the node and edge labels of a genotype graph.
#[derive(Debug, Clone, Copy, PartialEq, Builder, CopyGetters)]
#[builder(pattern = "owned")]
#[getset(get_copy = "pub")]
pub struct DotPreferences {
    /// Observed probability of each genotype.
    #[builder(default = "true")]
    show_probabilities: bool,
    /// Names of the samples showing each genotype.
    #[builder(default)]
    show_samples: bool,
    #[builder(default)]
    show_steady_state: bool,
    /// Down- and (normalized) up-weights next to the transition probability.
    #[builder(default)]
    show_pass_weights: bool,
}

impl Default for DotPreferences {
    fn default() -> Self {
        DotPreferences {
            show_probabilities: true,
            show_samples: false,
            show_steady_state: false,
            show_pass_weights: false,
        }
    }
}

pub fn genotype_graph<W: Write>(
    graph: &GenotypeGraph,
    preferences: &DotPreferences,
    mut out: W,
) -> Result<()> {
    writeln!(out, "digraph G {{")?;
    for (node, info) in graph.nodes().iter().enumerate() {
        let mut label = if preferences.show_probabilities() {
            format!("<{}, {:.3}>", info.label(), info.observed_probability())
        } else {
            info.label().to_owned()
        };
        if preferences.show_samples() && !info.samples().is_empty() {
            label.push_str(&format!("\\n{}", info.samples().join(", ")));
        }
        if preferences.show_steady_state() {
            label.push_str(&format!(
                "\\nsteady state: {:.3}",
                graph.steady_state().get(node)
            ));
        }
        writeln!(out, "{} [label=\"{}\"]", node, label)?;
    }
    for (from, to, weight) in graph.edges() {
        let mut label = format!("{:.3}", weight);
        if preferences.show_pass_weights() {
            let weights = graph.weights();
            label.push_str(&format!(
                "\\nDown: {:.3}\\nUp: {:.3}",
                weights.down()[[from, to]],
                weights.up_normalized()[[from, to]]
            ));
        }
        writeln!(out, "{} -> {} [label=\"{}\"]", from, to, label)?;
    }
    writeln!(out, "}}")?;
    out.flush()?;

    Ok(())
}

pub fn markov_chain<W: Write>(chain: &MarkovChain, mut out: W) -> Result<()> {
    writeln!(out, "digraph G {{")?;
    for state in 0..chain.n_states() {
        writeln!(out, "{} [label=\"{}\"]", state, chain.state(state))?;
    }
    for state in 0..chain.n_states() {
        for (target, probability) in chain.transitions(state) {
            writeln!(out, "{} -> {} [label=\"{:.3}\"]", state, target, probability)?;
        }
    }
    writeln!(out, "}}")?;
    out.flush()?;

    Ok(())
}

pub fn trait_graph<W: Write>(graph: &TraitGraph, mut out: W) -> Result<()> {
    writeln!(out, "digraph G {{")?;
    for node in 0..graph.n_nodes() {
        writeln!(out, "{} [label=\"{}\"]", node, graph.label(node))?;
    }
    for node in 0..graph.n_nodes() {
        for (child, weight) in graph.children(node) {
            writeln!(out, "{} -> {} [label=\"{:.3}\"]", node, child, weight)?;
        }
    }
    writeln!(out, "}}")?;
    out.flush()?;

    Ok(())
}

/// Render a generator. Edges are labelled with their transition probability
/// (red) and, except for self loops, with the probability given that a
/// mutation is acquired (blue).
pub fn generator<W: Write>(generator: &GeneratorGraph, mut out: W) -> Result<()> {
    writeln!(out, "digraph G {{")?;
    writeln!(out, "label = <Generator Graph>")?;
    writeln!(out, "labelloc = \"t\"")?;
    for node in 0..generator.n_nodes() {
        writeln!(
            out,
            "{} [label=\"{}\"]",
            node,
            generator.genotype(node).describe(generator.labels())
        )?;
    }
    for node in 0..generator.n_nodes() {
        let transitions = generator.transition_probabilities(node);
        let stay = transitions
            .iter()
            .find(|(target, _)| *target == node)
            .map_or(0.0, |(_, probability)| *probability);
        for (target, probability) in transitions {
            let mut label = format!("<font color='red'><b>{:.3}</b></font>", probability);
            if target != node && stay < 1.0 {
                label.push_str(&format!(
                    "<br/><font color='blue'><b>{:.3}</b></font>",
                    probability / (1.0 - stay)
                ));
            }
            writeln!(out, "{} -> {} [label=<{}>]", node, target, label)?;
        }
    }
    writeln!(out, "node [shape=plaintext]")?;
    writeln!(out, "subgraph cluster_legend {{")?;
    writeln!(out, "label = \"Legend\"")?;
    writeln!(
        out,
        "key [label=<<table border=\"0\" cellpadding=\"2\" cellspacing=\"0\" cellborder=\"0\">{}</table>>]",
        [
            ("red", "transition probabilities"),
            ("blue", "transition probabilities if acquiring a mutation"),
        ]
        .iter()
        .map(|(color, text)| format!(
            "<tr><td align=\"left\"><font color='{}'><b>{}</b></font> : {}</td></tr>",
            color, color, text
        ))
        .join("")
    )?;
    writeln!(out, "}}")?;
    writeln!(out, "}}")?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{example_dataset, labels};
    use crate::evolution::EngineConfig;
    use crate::evolution::ROOT;
    use crate::genotype::Genotype;

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn example_graph() -> GenotypeGraph {
        let mut dataset = example_dataset();
        dataset.compact();
        GenotypeGraph::new(&dataset, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_genotype_graph() {
        let graph = example_graph();
        let dot = render(|out| genotype_graph(&graph, &DotPreferences::default(), out));
        assert_eq!(
            dot,
            "digraph G {\n\
             0 [label=\"<clonal, 0.000>\"]\n\
             1 [label=\"<[B], 0.500>\"]\n\
             2 [label=\"<[A], 0.333>\"]\n\
             3 [label=\"<[A, C], 0.167>\"]\n\
             0 -> 1 [label=\"0.500\"]\n\
             0 -> 2 [label=\"0.500\"]\n\
             2 -> 3 [label=\"1.000\"]\n\
             }\n"
        );
    }

    #[test]
    fn test_genotype_graph_preferences() {
        let graph = example_graph();
        let preferences = DotPreferencesBuilder::default()
            .show_probabilities(false)
            .show_samples(true)
            .show_steady_state(true)
            .show_pass_weights(true)
            .build()
            .unwrap();
        let dot = render(|out| genotype_graph(&graph, &preferences, out));
        assert!(dot.contains("2 [label=\"[A]\\ns_3, s_5\\nsteady state: 0.000\"]"));
        assert!(dot.contains("0 [label=\"clonal\\nsteady state: 0.000\"]"));
        assert!(dot.contains("2 -> 3 [label=\"1.000\\nDown: 0.167\\nUp: 1.000\"]"));
    }

    #[test]
    fn test_markov_chain() {
        let chain = example_graph().markov_chain().unwrap();
        let dot = render(|out| markov_chain(&chain, out));
        assert!(dot.starts_with("digraph G {\n0 [label=\"clonal\"]\n"));
        assert!(dot.contains("3 [label=\"[A, C]\"]\n"));
        assert!(dot.contains("2 -> 3 [label=\"1.000\"]\n"));
    }

    #[test]
    fn test_trait_graph() {
        let graph = crate::trait_graph::tests::trait_graph(
            &["", "A", "F", "C"],
            &[(0, 1, 0.8), (0, 2, 0.3), (1, 3, 0.7), (2, 3, 0.2)],
        );
        let dot = render(|out| super::trait_graph(&graph, out));
        assert_eq!(
            dot,
            "digraph G {\n\
             0 [label=\"\"]\n\
             1 [label=\"A\"]\n\
             2 [label=\"F\"]\n\
             3 [label=\"C\"]\n\
             0 -> 1 [label=\"0.800\"]\n\
             0 -> 2 [label=\"0.300\"]\n\
             1 -> 3 [label=\"0.700\"]\n\
             2 -> 3 [label=\"0.200\"]\n\
             }\n"
        );

        let chain = graph.markov_chain().unwrap();
        let dot = render(|out| markov_chain(&chain, out));
        assert!(dot.contains("3 [label=\"[F]\"]\n"));
        assert!(dot.contains("0 -> 1 [label=\"0.727\"]\n"));
        assert!(dot.contains("3 -> 4 [label=\"1.000\"]\n"));
    }

    #[test]
    fn test_generator() {
        let mut generator = GeneratorGraph::new(labels(&["A", "B"]));
        let a = generator.add(Genotype::from(vec![true, false])).unwrap();
        generator.link(ROOT, a, 1.0).unwrap();
        generator.link(a, a, 1.0).unwrap();
        let ab = generator.add(Genotype::from(vec![true, true])).unwrap();
        generator.link(a, ab, 3.0).unwrap();

        let dot = render(|out| super::generator(&generator, out));
        assert!(dot.contains("1 [label=\"[A]\"]\n"));
        assert!(dot.contains(
            "1 -> 1 [label=<<font color='red'><b>0.250</b></font>>]\n"
        ));
        assert!(dot.contains(
            "1 -> 2 [label=<<font color='red'><b>0.750</b></font>\
             <br/><font color='blue'><b>1.000</b></font>>]\n"
        ));
        assert!(dot.contains("0 -> 1 [label=<<font color='red'><b>1.000</b></font>\
             <br/><font color='blue'><b>1.000</b></font>>]\n"));
    }
}
