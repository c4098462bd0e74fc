// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

/// Label of the unmutated root genotype.
pub static CLONAL_LABEL: &str = "clonal";

/// Probability mass entering the up-weight pass at the clonal root.
pub static ROOT_INFLOW: f64 = 1.0;

/// Tolerance for outgoing transition probabilities of a Markov state.
pub static TRANSITION_TOLERANCE: f64 = 1e-4;

/// Random generator graphs enumerate all 2^n genotypes.
pub static MAX_RANDOM_GENERATOR_GENES: usize = 19;

/// Prefix of generated sample names (`s_1`, `s_2`, ...).
pub static SAMPLE_PREFIX: &str = "s_";
