// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use strum_macros::{EnumString, IntoStaticStr};

use crate::genotype::Genotype;

/// Index of the clonal root in every genotype graph.
pub const ROOT: usize = 0;

/// Rule deciding which ancestors of a genotype become its parents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum LinkingStrategy {
    /// Subset ancestors with minimal Hamming distance.
    #[strum(serialize = "minimal-distance")]
    #[serde(rename = "minimal-distance")]
    MinimalDistance,
    /// Subset ancestors with exactly one mutation less.
    #[strum(serialize = "single-mutation")]
    #[serde(rename = "single-mutation")]
    SingleMutation,
}

impl Default for LinkingStrategy {
    fn default() -> Self {
        LinkingStrategy::MinimalDistance
    }
}

impl LinkingStrategy {
    /// Parents of `genotypes[node]` among `genotypes[..node]`, in ascending
    /// index order.
    ///
    /// `genotypes` must be sorted by the genotype order and start with the
    /// clonal root. Nodes without any qualifying ancestor are attached to the
    /// root.
    pub fn parents(self, genotypes: &[Genotype], node: usize) -> Vec<usize> {
        if node == ROOT {
            return Vec::new();
        }
        let mut parents = match self {
            LinkingStrategy::MinimalDistance => minimal_distance_parents(genotypes, node),
            LinkingStrategy::SingleMutation => single_mutation_parents(genotypes, node),
        };
        if parents.is_empty() {
            parents.push(ROOT);
        }
        parents.sort_unstable();
        parents
    }
}

fn minimal_distance_parents(genotypes: &[Genotype], node: usize) -> Vec<usize> {
    let genotype = &genotypes[node];
    let mut best = usize::MAX;
    let mut parents = Vec::new();

    for candidate in (ROOT + 1..node).rev() {
        let ancestor = &genotypes[candidate];
        if ancestor.mutation_count() == genotype.mutation_count() {
            continue;
        }
        // candidates are sorted by mutation count, no closer one can follow
        if genotype.mutation_count() - ancestor.mutation_count() > best {
            break;
        }
        if !ancestor.is_subset_of(genotype) {
            continue;
        }
        let distance = genotype.hamming_distance(ancestor);
        if distance < best {
            best = distance;
            parents.clear();
        }
        if distance == best {
            parents.push(candidate);
        }
    }

    parents
}

fn single_mutation_parents(genotypes: &[Genotype], node: usize) -> Vec<usize> {
    let genotype = &genotypes[node];
    (ROOT + 1..node)
        .filter(|candidate| {
            let ancestor = &genotypes[*candidate];
            ancestor.mutation_count() + 1 == genotype.mutation_count()
                && ancestor.is_subset_of(genotype)
        })
        .collect()
}
