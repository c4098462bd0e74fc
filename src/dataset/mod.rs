// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Reverse;
use std::collections::{btree_map, BTreeMap};

use itertools::Itertools;

pub mod io;

use crate::constants::SAMPLE_PREFIX;
use crate::errors::{Error, Result};
use crate::genotype::Genotype;

/// A distinct genotype together with the samples showing it.
#[derive(Clone, Debug, PartialEq, Getters, new)]
#[getset(get = "pub")]
pub struct Entry {
    genotype: Genotype,
    frequency: usize,
    samples: Vec<String>,
}

/// Mutational profiles of a cohort of tumor samples over a fixed set of genes.
///
/// Samples with an unmutated genotype carry no information about the order of
/// mutations and are dropped on construction. Observed frequencies are only
/// available after `compact()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    labels: Vec<String>,
    entries: Vec<Entry>,
    compacted: bool,
}

impl Dataset {
    /// Create a dataset from gene labels and named sample genotypes.
    pub fn new(labels: Vec<String>, samples: Vec<(String, Genotype)>) -> Result<Self> {
        let mut entries = Vec::with_capacity(samples.len());
        for (name, genotype) in samples {
            if genotype.len() != labels.len() {
                return Err(Error::GenotypeLengthMismatch {
                    sample: name,
                    expected: labels.len(),
                    found: genotype.len(),
                });
            }
            entries.push(Entry::new(genotype, 1, vec![name]));
        }

        let mut dataset = Dataset {
            labels,
            entries,
            compacted: false,
        };
        dataset.filter_clonal_genotypes();

        Ok(dataset)
    }

    /// Create a dataset from a boolean matrix (one row per sample).
    /// Samples are named `s_1`, `s_2`, ... in row order.
    pub fn from_matrix(labels: Vec<String>, rows: &[Vec<bool>]) -> Result<Self> {
        let samples = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                (
                    format!("{}{}", SAMPLE_PREFIX, i + 1),
                    Genotype::from(row.as_slice()),
                )
            })
            .collect_vec();
        Dataset::new(labels, samples)
    }

    fn filter_clonal_genotypes(&mut self) {
        let before = self.n_samples();
        self.entries.retain(|entry| !entry.genotype.is_clonal());
        let removed = before - self.n_samples();
        if removed > 0 {
            info!(
                "Ignoring {} samples without any mutated gene (clonal genotype).",
                removed
            );
        }
    }

    /// Merge samples with identical genotypes, summing up their frequencies.
    /// Afterwards, genotypes are unique and sorted by number of mutations first
    /// and bits second.
    pub fn compact(&mut self) {
        let mut groups: BTreeMap<Genotype, Entry> = BTreeMap::new();
        for entry in self.entries.drain(..) {
            match groups.entry(entry.genotype.clone()) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    let group = slot.get_mut();
                    group.frequency += entry.frequency;
                    group.samples.extend(entry.samples);
                }
            }
        }
        self.entries = groups.into_iter().map(|(_, entry)| entry).collect();
        self.compacted = true;

        info!(
            "Compacted {} samples into {} distinct genotypes.",
            self.n_samples(),
            self.n_genotypes()
        );
    }

    /// Keep only the `threshold` most frequently mutated genes. Genes mutated
    /// as often as the last kept one are kept as well.
    pub fn shrink(&mut self, threshold: usize) -> Result<()> {
        if threshold == 0 {
            return Err(Error::InvalidThreshold { threshold });
        }
        if threshold >= self.n_genes() {
            return Ok(());
        }

        let counts = self.gene_mutation_counts();
        let ranked = (0..self.n_genes())
            .sorted_by_key(|gene| Reverse(counts[*gene]))
            .collect_vec();
        let cutoff = counts[ranked[threshold - 1]];
        let selected = ranked
            .into_iter()
            .take_while(|gene| counts[*gene] >= cutoff)
            .collect_vec();

        info!(
            "Keeping {} of {} genes (at least {} mutated samples each).",
            selected.len(),
            self.n_genes(),
            cutoff
        );

        self.labels = selected
            .iter()
            .map(|gene| self.labels[*gene].clone())
            .collect();
        for entry in &mut self.entries {
            entry.genotype = entry.genotype.project(&selected);
        }
        self.filter_clonal_genotypes();
        if self.compacted {
            self.compact();
        }

        Ok(())
    }

    /// Number of samples in which each gene is mutated.
    pub fn gene_mutation_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_genes()];
        for entry in &self.entries {
            for gene in entry.genotype.mutated_genes() {
                counts[gene] += entry.frequency;
            }
        }
        counts
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_compacted(&self) -> bool {
        self.compacted
    }

    pub fn n_genes(&self) -> usize {
        self.labels.len()
    }

    /// Number of entries, i.e. distinct genotypes once compacted.
    pub fn n_genotypes(&self) -> usize {
        self.entries.len()
    }

    /// Number of (non-clonal) samples.
    pub fn n_samples(&self) -> usize {
        self.entries.iter().map(|entry| entry.frequency).sum()
    }

    pub fn get(&self, i: usize) -> &Genotype {
        &self.entries[i].genotype
    }

    pub fn samples(&self, i: usize) -> &[String] {
        &self.entries[i].samples
    }

    /// Number of samples showing the i-th genotype.
    pub fn frequency_of(&self, i: usize) -> Result<usize> {
        if !self.compacted {
            return Err(Error::NotCompacted);
        }
        Ok(self.entries[i].frequency)
    }

    /// Observed probability of the i-th genotype.
    pub fn normalized_frequency_of(&self, i: usize) -> Result<f64> {
        let frequency = self.frequency_of(i)?;
        Ok(frequency as f64 / self.n_samples() as f64)
    }

    /// Labels of the genes mutated in the given genotype.
    pub fn translate(&self, genotype: &Genotype) -> Result<Vec<&str>> {
        if genotype.len() != self.n_genes() {
            return Err(Error::GenotypeLengthMismatch {
                sample: genotype.to_string(),
                expected: self.n_genes(),
                found: genotype.len(),
            });
        }
        Ok(genotype
            .mutated_genes()
            .map(|gene| self.labels[gene].as_str())
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| (*label).to_owned()).collect()
    }

    pub(crate) fn rows(rows: &[&[u8]]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|row| row.iter().map(|v| *v == 1).collect())
            .collect()
    }

    /// A:2, B:3, AC:1 over genes A, B, C.
    pub(crate) fn example_dataset() -> Dataset {
        Dataset::from_matrix(
            labels(&["A", "B", "C"]),
            &rows(&[
                &[0, 1, 0],
                &[1, 0, 1],
                &[1, 0, 0],
                &[0, 1, 0],
                &[1, 0, 0],
                &[0, 1, 0],
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_clonal_samples_are_filtered() {
        let dataset = Dataset::from_matrix(
            labels(&["A", "B"]),
            &rows(&[&[0, 0], &[1, 0], &[0, 0], &[1, 1]]),
        )
        .unwrap();
        assert_eq!(dataset.n_samples(), 2);
        assert_eq!(dataset.samples(0), &["s_2".to_owned()]);
        assert_eq!(dataset.samples(1), &["s_4".to_owned()]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Dataset::new(
            labels(&["A", "B"]),
            vec![("x".to_owned(), Genotype::from(vec![true]))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::GenotypeLengthMismatch {
                sample: "x".to_owned(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_compact() {
        let mut dataset = example_dataset();
        dataset.compact();

        assert_eq!(dataset.n_genotypes(), 3);
        assert_eq!(dataset.n_samples(), 6);
        assert_eq!(dataset.get(0), &Genotype::from(vec![false, true, false]));
        assert_eq!(dataset.get(1), &Genotype::from(vec![true, false, false]));
        assert_eq!(dataset.get(2), &Genotype::from(vec![true, false, true]));
        assert_eq!(dataset.frequency_of(0).unwrap(), 3);
        assert_eq!(dataset.frequency_of(1).unwrap(), 2);
        assert_eq!(dataset.frequency_of(2).unwrap(), 1);
        assert_eq!(
            dataset.samples(0),
            &["s_1".to_owned(), "s_4".to_owned(), "s_6".to_owned()]
        );
        assert_relative_eq!(dataset.normalized_frequency_of(1).unwrap(), 2.0 / 6.0);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let mut once = example_dataset();
        once.compact();
        let mut twice = once.clone();
        twice.compact();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_compact_is_independent_of_input_order() {
        let mut forward = example_dataset();
        let mut backward = Dataset::new(
            forward.labels().to_vec(),
            forward
                .entries()
                .iter()
                .rev()
                .map(|entry| (entry.samples()[0].clone(), entry.genotype().clone()))
                .collect(),
        )
        .unwrap();
        forward.compact();
        backward.compact();
        let genotypes = |dataset: &Dataset| {
            dataset
                .entries()
                .iter()
                .map(|entry| (entry.genotype().clone(), *entry.frequency()))
                .collect_vec()
        };
        assert_eq!(genotypes(&forward), genotypes(&backward));
    }

    #[test]
    fn test_not_compacted() {
        let dataset = example_dataset();
        assert_eq!(dataset.frequency_of(0), Err(Error::NotCompacted));
        assert_eq!(dataset.normalized_frequency_of(0), Err(Error::NotCompacted));
    }

    #[test]
    fn test_shrink_keeps_ties() {
        // A: 5, B: 5, C: 2
        let mut dataset = Dataset::from_matrix(
            labels(&["A", "B", "C"]),
            &rows(&[
                &[1, 1, 0],
                &[1, 1, 1],
                &[1, 0, 0],
                &[1, 0, 1],
                &[1, 0, 0],
                &[0, 1, 0],
                &[0, 1, 0],
                &[0, 1, 0],
            ]),
        )
        .unwrap();
        dataset.compact();
        assert_eq!(dataset.gene_mutation_counts(), vec![5, 5, 2]);

        dataset.shrink(1).unwrap();
        assert_eq!(dataset.labels(), &labels(&["A", "B"])[..]);
        assert_eq!(dataset.n_samples(), 8);
        assert!(dataset.is_compacted());
        // {A,B} (x2), {A} (x3), {B} (x3)
        assert_eq!(dataset.n_genotypes(), 3);
        assert_eq!(dataset.frequency_of(2).unwrap(), 2);
    }

    #[test]
    fn test_shrink_refilters_clonal_genotypes() {
        let mut dataset = Dataset::from_matrix(
            labels(&["A", "B", "C"]),
            &rows(&[&[1, 0, 0], &[1, 1, 0], &[0, 0, 1], &[1, 0, 0]]),
        )
        .unwrap();
        dataset.shrink(1).unwrap();
        assert_eq!(dataset.labels(), &labels(&["A"])[..]);
        assert_eq!(dataset.n_samples(), 3);
        assert!(!dataset.is_compacted());
    }

    #[test]
    fn test_shrink_invalid_threshold() {
        let mut dataset = example_dataset();
        assert_eq!(
            dataset.shrink(0),
            Err(Error::InvalidThreshold { threshold: 0 })
        );
    }

    #[test]
    fn test_shrink_noop() {
        let mut dataset = example_dataset();
        dataset.compact();
        let before = dataset.clone();
        dataset.shrink(3).unwrap();
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_translate() {
        let dataset = example_dataset();
        assert_eq!(
            dataset
                .translate(&Genotype::from(vec![true, false, true]))
                .unwrap(),
            vec!["A", "C"]
        );
        assert!(dataset.translate(&Genotype::clonal(3)).unwrap().is_empty());
        assert_eq!(
            dataset.translate(&Genotype::from(vec![true, false])),
            Err(Error::GenotypeLengthMismatch {
                sample: "1 0".to_owned(),
                expected: 3,
                found: 2
            })
        );
    }
}
