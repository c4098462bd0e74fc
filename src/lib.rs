// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Inference of tumor clonal evolution paths.
//!
//! The mutational profiles (genotypes) of a cohort of tumor samples are
//! arranged in a DAG rooted at the unmutated genotype, linking each genotype
//! to its closest ancestors. Every edge receives a transition probability
//! consistent with the observed genotype frequencies, from which a steady
//! state and a Markov chain are derived.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate derive_builder;
#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod cli;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod evolution;
pub mod genotype;
pub mod graph;
pub mod output;
pub mod simulation;
pub mod trait_graph;
