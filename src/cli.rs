// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use crate::dataset::io::{self as dataset_io, Format};
use crate::dataset::Dataset;
use crate::evolution::{EngineConfig, GenotypeGraph, LinkingStrategy};
use crate::output::{dot, json, table, DotPreferencesBuilder};
use crate::simulation::GeneratorGraph;

#[derive(Debug, StructOpt, Serialize, Deserialize, Clone)]
#[structopt(
    name = "genotype-paths",
    about = "Infer tumor clonal evolution paths from the mutational profiles of a cohort of samples."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
pub enum GenotypePaths {
    #[structopt(
        name = "infer",
        about = "Build the weighted genotype graph of a dataset and print it in dot format."
    )]
    #[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
    Infer {
        #[structopt(
            parse(from_os_str),
            help = "Mutation matrix to process (if omitted, read from STDIN)."
        )]
        input: Option<PathBuf>,
        #[structopt(
            long,
            default_value = "bml",
            possible_values = &["bml", "capri"],
            help = "Format of the mutation matrix."
        )]
        format: Format,
        #[structopt(
            long,
            help = "Only consider the given number of most frequently mutated genes \
                    (genes mutated as often as the last one are kept as well)."
        )]
        shrink: Option<usize>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "Dot file that shall contain the genotype graph (if omitted, write to STDOUT)."
        )]
        output: Option<PathBuf>,
        #[structopt(
            long,
            possible_values = &["minimal-distance", "single-mutation"],
            help = "How genotypes are linked to their ancestors (overrides the config file)."
        )]
        linking: Option<LinkingStrategy>,
        #[structopt(
            long = "root-inflow",
            help = "Probability mass entering the up-weight pass at the clonal root \
                    (overrides the config file)."
        )]
        root_inflow: Option<f64>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "YAML file with graph construction settings."
        )]
        config: Option<PathBuf>,
        #[structopt(
            long = "steady-state",
            parse(from_os_str),
            help = "Optional path for a tab separated table with the steady state of each genotype."
        )]
        steady_state: Option<PathBuf>,
        #[structopt(
            long = "markov-chain",
            parse(from_os_str),
            help = "Optional path for the Markov chain of the genotype graph in dot format."
        )]
        markov_chain: Option<PathBuf>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "Optional path for the nodes and weighted edges of the genotype graph in JSON format."
        )]
        json: Option<PathBuf>,
        #[structopt(long = "show-samples", help = "Show sample names in the graph.")]
        show_samples: bool,
        #[structopt(
            long = "hide-probabilities",
            help = "Do not show observed probabilities in the graph."
        )]
        hide_probabilities: bool,
        #[structopt(long = "show-steady-state", help = "Show the steady state in the graph.")]
        show_steady_state: bool,
        #[structopt(
            long = "show-pass-weights",
            help = "Show down- and up-weights next to the transition probabilities."
        )]
        show_pass_weights: bool,
    },
    #[structopt(
        name = "simulate",
        about = "Generate a synthetic dataset from a random generator graph."
    )]
    #[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
    Simulate {
        #[structopt(long, default_value = "5", help = "Number of genes (at most 19).")]
        genes: usize,
        #[structopt(long, default_value = "100", help = "Number of samples to simulate.")]
        samples: usize,
        #[structopt(
            long = "path-length",
            default_value = "5",
            help = "Number of random walk steps per sample."
        )]
        path_length: usize,
        #[structopt(long, default_value = "0", help = "Seed for the random walks.")]
        seed: u64,
        #[structopt(
            long = "generator-seed",
            help = "Seed for the generator graph (defaults to the walk seed)."
        )]
        generator_seed: Option<u64>,
        #[structopt(
            long,
            default_value = "bml",
            possible_values = &["bml", "capri"],
            help = "Format of the generated mutation matrix."
        )]
        format: Format,
        #[structopt(
            long,
            parse(from_os_str),
            help = "File that shall contain the generated dataset (if omitted, write to STDOUT)."
        )]
        output: Option<PathBuf>,
        #[structopt(
            long = "generator-dot",
            parse(from_os_str),
            help = "Optional path for the generator graph in dot format."
        )]
        generator_dot: Option<PathBuf>,
        #[structopt(
            long = "exact-distribution",
            parse(from_os_str),
            help = "Optional path for a tab separated table with the exact genotype \
                    distribution after each step."
        )]
        exact_distribution: Option<PathBuf>,
    },
    #[structopt(name = "convert", about = "Convert between mutation matrix formats.")]
    #[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
    Convert {
        #[structopt(
            parse(from_os_str),
            help = "Mutation matrix to convert (if omitted, read from STDIN)."
        )]
        input: Option<PathBuf>,
        #[structopt(long, possible_values = &["bml", "capri"], help = "Input format.")]
        from: Format,
        #[structopt(long, possible_values = &["bml", "capri"], help = "Output format.")]
        to: Format,
        #[structopt(
            long,
            parse(from_os_str),
            help = "File that shall contain the converted dataset (if omitted, write to STDOUT)."
        )]
        output: Option<PathBuf>,
        #[structopt(long, help = "Group samples with identical genotypes.")]
        compact: bool,
        #[structopt(
            long,
            help = "Only keep the given number of most frequently mutated genes."
        )]
        shrink: Option<usize>,
    },
}

pub fn run(opt: GenotypePaths) -> Result<()> {
    match opt {
        GenotypePaths::Infer {
            ref input,
            format,
            shrink,
            ref output,
            linking,
            root_inflow,
            ref config,
            ref steady_state,
            ref markov_chain,
            ref json,
            show_samples,
            hide_probabilities,
            show_steady_state,
            show_pass_weights,
        } => {
            let mut engine_config = match config {
                Some(path) => EngineConfig::from_yaml(path)?,
                None => EngineConfig::default(),
            };
            if let Some(linking) = linking {
                engine_config.linking = linking;
            }
            if let Some(root_inflow) = root_inflow {
                engine_config.root_inflow = root_inflow;
            }
            engine_config.validate()?;

            let mut dataset = read_dataset(input, format)?;
            dataset.compact();
            if let Some(threshold) = shrink {
                dataset.shrink(threshold)?;
            }

            let graph = GenotypeGraph::new(&dataset, &engine_config)?;
            let preferences = DotPreferencesBuilder::default()
                .show_probabilities(!hide_probabilities)
                .show_samples(show_samples)
                .show_steady_state(show_steady_state)
                .show_pass_weights(show_pass_weights)
                .build()?;
            dot::genotype_graph(&graph, &preferences, writer(output)?)?;

            if let Some(path) = steady_state {
                table::steady_state(&graph, create(path)?)?;
            }
            if let Some(path) = markov_chain {
                dot::markov_chain(&graph.markov_chain()?, create(path)?)?;
            }
            if let Some(path) = json {
                json::genotype_graph(&graph, create(path)?)?;
            }
        }
        GenotypePaths::Simulate {
            genes,
            samples,
            path_length,
            seed,
            generator_seed,
            format,
            ref output,
            ref generator_dot,
            ref exact_distribution,
        } => {
            let mut generator_rng = StdRng::seed_from_u64(generator_seed.unwrap_or(seed));
            let generator = GeneratorGraph::random(genes, &mut generator_rng)?;

            let mut rng = StdRng::seed_from_u64(seed);
            let dataset = generator.generate(samples, path_length, &mut rng)?;
            info!(
                "Simulated {} samples, {} of them with at least one mutation.",
                samples,
                dataset.n_samples()
            );
            dataset_io::write(&dataset, writer(output)?, format)?;

            if let Some(path) = generator_dot {
                dot::generator(&generator, create(path)?)?;
            }
            if let Some(path) = exact_distribution {
                table::distributions(&generator, path_length, create(path)?)?;
            }
        }
        GenotypePaths::Convert {
            ref input,
            from,
            to,
            ref output,
            compact,
            shrink,
        } => {
            let mut dataset = read_dataset(input, from)?;
            if compact {
                dataset.compact();
            }
            if let Some(threshold) = shrink {
                dataset.shrink(threshold)?;
            }
            dataset_io::write(&dataset, writer(output)?, to)?;
        }
    }
    Ok(())
}

fn read_dataset(input: &Option<PathBuf>, format: Format) -> Result<Dataset> {
    match input {
        Some(path) => dataset_io::from_path(path, format),
        None => dataset_io::from_stdin(format),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn writer(output: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(create(path)?),
        None => Box::new(io::stdout()),
    })
}
