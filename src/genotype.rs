// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use bv::BitVec;
use itertools::Itertools;

use crate::constants::CLONAL_LABEL;

/// A mutational profile: bit `i` is set if gene `i` is mutated.
///
/// Genotypes are ordered by their number of mutations first and by their
/// bits (lexicographically, unmutated before mutated) second.
#[derive(Clone, Debug)]
pub struct Genotype {
    bits: BitVec<u64>,
    mutation_count: usize,
}

impl Genotype {
    /// The unmutated genotype over `n_genes` genes.
    pub fn clonal(n_genes: usize) -> Self {
        Genotype {
            bits: BitVec::new_fill(false, n_genes as u64),
            mutation_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.len() == 0
    }

    pub fn is_mutated(&self, gene: usize) -> bool {
        self.bits.get(gene as u64)
    }

    pub fn mutation_count(&self) -> usize {
        self.mutation_count
    }

    pub fn is_clonal(&self) -> bool {
        self.mutation_count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bits.len()).map(move |i| self.bits.get(i))
    }

    /// Indices of the mutated genes, in ascending order.
    pub fn mutated_genes(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .enumerate()
            .filter_map(|(i, mutated)| if mutated { Some(i) } else { None })
    }

    /// True if every gene mutated in `self` is also mutated in `other`.
    pub fn is_subset_of(&self, other: &Genotype) -> bool {
        self.len() == other.len()
            && self.mutation_count <= other.mutation_count
            && self.iter().zip(other.iter()).all(|(a, b)| !a || b)
    }

    /// Number of genes in which both genotypes differ. Both genotypes must
    /// have the same length.
    pub(crate) fn hamming_distance(&self, other: &Genotype) -> usize {
        assert_eq!(
            self.len(),
            other.len(),
            "bug: hamming distance of genotypes with different length"
        );
        self.iter().zip(other.iter()).filter(|(a, b)| a != b).count()
    }

    /// The mutated genes as `[A, C]`, or `clonal` if none is mutated.
    pub fn describe(&self, labels: &[String]) -> String {
        if self.is_clonal() {
            CLONAL_LABEL.to_owned()
        } else {
            format!(
                "[{}]",
                self.mutated_genes().map(|gene| labels[gene].as_str()).join(", ")
            )
        }
    }

    /// Restrict the genotype to the given genes, in the given order.
    pub fn project(&self, genes: &[usize]) -> Genotype {
        genes.iter().map(|gene| self.is_mutated(*gene)).collect()
    }
}

impl FromIterator<bool> for Genotype {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitVec::new();
        let mut mutation_count = 0;
        for mutated in iter {
            if mutated {
                mutation_count += 1;
            }
            bits.push(mutated);
        }
        Genotype {
            bits,
            mutation_count,
        }
    }
}

impl From<&[bool]> for Genotype {
    fn from(values: &[bool]) -> Self {
        values.iter().cloned().collect()
    }
}

impl From<Vec<bool>> for Genotype {
    fn from(values: Vec<bool>) -> Self {
        values.into_iter().collect()
    }
}

impl PartialEq for Genotype {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.mutation_count == other.mutation_count
            && self.iter().eq(other.iter())
    }
}

impl Eq for Genotype {}

impl Ord for Genotype {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mutation_count
            .cmp(&other.mutation_count)
            .then_with(|| self.iter().cmp(other.iter()))
    }
}

impl PartialOrd for Genotype {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Space separated 0/1 values, the encoding used by the dataset formats.
impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.iter().map(|mutated| if mutated { "1" } else { "0" }).join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotype(bits: &[u8]) -> Genotype {
        bits.iter().map(|b| *b == 1).collect()
    }

    #[test]
    fn test_mutation_count() {
        assert_eq!(genotype(&[1, 0, 1]).mutation_count(), 2);
        assert!(Genotype::clonal(4).is_clonal());
        assert_eq!(Genotype::clonal(4).len(), 4);
    }

    #[test]
    fn test_order() {
        let mut genotypes = vec![
            genotype(&[1, 1, 0]),
            genotype(&[1, 0, 0]),
            genotype(&[0, 0, 1]),
            genotype(&[0, 1, 1]),
        ];
        genotypes.sort();
        assert_eq!(
            genotypes,
            vec![
                genotype(&[0, 0, 1]),
                genotype(&[1, 0, 0]),
                genotype(&[0, 1, 1]),
                genotype(&[1, 1, 0]),
            ]
        );
    }

    #[test]
    fn test_subset() {
        let a = genotype(&[1, 0, 0]);
        let ac = genotype(&[1, 0, 1]);
        let b = genotype(&[0, 1, 0]);
        assert!(a.is_subset_of(&ac));
        assert!(a.is_subset_of(&a));
        assert!(!ac.is_subset_of(&a));
        assert!(!b.is_subset_of(&ac));
        assert!(Genotype::clonal(3).is_subset_of(&b));
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(genotype(&[1, 0, 0]).hamming_distance(&genotype(&[1, 1, 1])), 2);
        assert_eq!(genotype(&[1, 0, 0]).hamming_distance(&genotype(&[0, 1, 0])), 2);
        assert_eq!(genotype(&[1, 0]).hamming_distance(&genotype(&[1, 0])), 0);
    }

    #[test]
    fn test_project() {
        let g = genotype(&[1, 0, 1, 1]);
        assert_eq!(g.project(&[3, 1]), genotype(&[1, 0]));
        assert_eq!(g.mutated_genes().collect_vec(), vec![0, 2, 3]);
        assert_eq!(g.to_string(), "1 0 1 1");
    }

    #[test]
    fn test_describe() {
        let labels = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
        assert_eq!(genotype(&[1, 0, 1]).describe(&labels), "[A, C]");
        assert_eq!(Genotype::clonal(3).describe(&labels), "clonal");
    }
}
