// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Tab separated tables.

use std::io::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::evolution::GenotypeGraph;
use crate::simulation::GeneratorGraph;

#[derive(Debug, Serialize)]
struct SteadyStateRecord<'a> {
    genotype: &'a str,
    samples: String,
    observed_probability: f64,
    visit_probability: f64,
    steady_state: f64,
}

/// One row per node of the genotype graph.
pub fn steady_state<W: Write>(graph: &GenotypeGraph, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    let steady_state = graph.steady_state();
    for (node, info) in graph.nodes().iter().enumerate() {
        writer.serialize(SteadyStateRecord {
            genotype: info.label(),
            samples: info.samples().join(","),
            observed_probability: *info.observed_probability(),
            visit_probability: steady_state.visits()[node],
            steady_state: steady_state.get(node),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Exact node distribution of the generator walk, one row per step from 0 up
/// to `steps`.
pub fn distributions<W: Write>(generator: &GeneratorGraph, steps: usize, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    let header = (0..generator.n_nodes())
        .map(|node| generator.genotype(node).describe(generator.labels()))
        .collect_vec();
    writer.write_record(std::iter::once("step".to_owned()).chain(header))?;

    let mut distribution = generator.distribution_after(0);
    for step in 0..=steps {
        if step > 0 {
            distribution = generator.step(&distribution);
        }
        writer.write_record(
            std::iter::once(step.to_string())
                .chain(distribution.iter().map(|probability| probability.to_string())),
        )?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{example_dataset, labels};
    use crate::evolution::{EngineConfig, ROOT};
    use crate::genotype::Genotype;

    #[test]
    fn test_steady_state() {
        let mut dataset = example_dataset();
        dataset.compact();
        let graph = GenotypeGraph::new(&dataset, &EngineConfig::default()).unwrap();

        let mut out = Vec::new();
        steady_state(&graph, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect_vec();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "genotype\tsamples\tobserved_probability\tvisit_probability\tsteady_state"
        );
        assert!(lines[1].starts_with("clonal\t\t0.0\t1.0\t0.0"));
        assert!(lines[2].starts_with("[B]\ts_1,s_4,s_6\t0.5\t"));
    }

    #[test]
    fn test_distributions() {
        let mut generator = GeneratorGraph::new(labels(&["A"]));
        let a = generator.add(Genotype::from(vec![true])).unwrap();
        generator.link(ROOT, ROOT, 1.0).unwrap();
        generator.link(ROOT, a, 1.0).unwrap();

        let mut out = Vec::new();
        distributions(&generator, 2, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "step\tclonal\t[A]\n0\t1\t0\n1\t0.5\t0.5\n2\t0.25\t0.75\n"
        );
    }
}
