// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Readers and writers for the BML and CAPRI mutation matrix formats.
//!
//! BML:
//! ```text
//! #samples #genes
//! gene_1 ... gene_n
//! sample_1 0 1 ... 0
//! ...
//! ```
//!
//! CAPRI:
//! ```text
//! s\g gene_1 ... gene_n
//! sample_1 0 1 ... 0
//! ...
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use strum_macros::{EnumString, IntoStaticStr};

use crate::dataset::Dataset;
use crate::errors::{self, invalid_input};
use crate::genotype::Genotype;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum Format {
    #[strum(serialize = "bml")]
    #[serde(rename = "bml")]
    Bml,
    #[strum(serialize = "capri")]
    #[serde(rename = "capri")]
    Capri,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Bml => "BML",
            Format::Capri => "CAPRI",
        }
    }
}

/// Read a dataset in the given format.
pub fn read<R: Read>(mut reader: R, format: Format) -> Result<Dataset> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(parse(&text, format)?)
}

pub fn from_path<P: AsRef<Path>>(path: P, format: Format) -> Result<Dataset> {
    read(File::open(path)?, format)
}

pub fn from_stdin(format: Format) -> Result<Dataset> {
    read(io::stdin(), format)
}

pub fn parse(text: &str, format: Format) -> errors::Result<Dataset> {
    match format {
        Format::Bml => parse_bml(text),
        Format::Capri => parse_capri(text),
    }
}

/// Whitespace separated tokens together with their (1-based) line number.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    format: Format,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, format: Format) -> Self {
        Tokens {
            inner: Box::new(
                text.lines()
                    .enumerate()
                    .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token))),
            ),
            format,
            last_line: text.lines().count(),
        }
    }

    fn next_token(&mut self, expected: &str) -> errors::Result<(usize, &'a str)> {
        self.inner.next().ok_or_else(|| {
            invalid_input(
                self.format.name(),
                self.last_line,
                &format!("unexpected end of input, expected {}", expected),
            )
        })
    }

    fn next_count(&mut self, expected: &str) -> errors::Result<usize> {
        let (line, token) = self.next_token(expected)?;
        token.parse().map_err(|_| {
            invalid_input(
                self.format.name(),
                line,
                &format!("expected {}, found '{}'", expected, token),
            )
        })
    }
}

fn parse_value(format: Format, line: usize, token: &str) -> errors::Result<bool> {
    match token {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(invalid_input(
            format.name(),
            line,
            &format!("invalid mutation value '{}', must be 0 or 1", token),
        )),
    }
}

fn parse_bml(text: &str) -> errors::Result<Dataset> {
    let mut tokens = Tokens::new(text, Format::Bml);
    let n_samples = tokens.next_count("number of samples")?;
    let n_genes = tokens.next_count("number of genes")?;

    // header counts are untrusted, vectors grow with the tokens actually read
    let mut labels = Vec::new();
    for _ in 0..n_genes {
        labels.push(tokens.next_token("gene label")?.1.to_owned());
    }

    let mut samples = Vec::new();
    for _ in 0..n_samples {
        let name = tokens.next_token("sample name")?.1.to_owned();
        let mut genotype = Vec::with_capacity(labels.len());
        for _ in 0..n_genes {
            let (line, token) = tokens.next_token("mutation value")?;
            genotype.push(parse_value(Format::Bml, line, token)?);
        }
        samples.push((name, Genotype::from(genotype)));
    }
    if let Some((line, _)) = tokens.inner.next() {
        warn!(
            "Ignoring input after the {} declared samples (starting at line {}).",
            n_samples, line
        );
    }

    Dataset::new(labels, samples)
}

fn parse_capri(text: &str) -> errors::Result<Dataset> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| invalid_input("CAPRI", 1, "missing header line"))?;
    // the first header token names the matrix corner and is ignored
    let labels = header
        .split_whitespace()
        .skip(1)
        .map(|label| label.to_owned())
        .collect_vec();

    let mut samples = Vec::new();
    for (line, content) in lines {
        let mut tokens = content.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| invalid_input("CAPRI", line, "missing sample name"))?
            .to_owned();
        let genotype = tokens
            .map(|token| parse_value(Format::Capri, line, token))
            .collect::<errors::Result<Vec<bool>>>()?;
        if genotype.len() != labels.len() {
            return Err(invalid_input(
                "CAPRI",
                line,
                &format!(
                    "expected {} mutation values, found {}",
                    labels.len(),
                    genotype.len()
                ),
            ));
        }
        samples.push((name, Genotype::from(genotype)));
    }

    Dataset::new(labels, samples)
}

/// Write the dataset in the given format, one line per sample.
pub fn write<W: Write>(dataset: &Dataset, mut writer: W, format: Format) -> Result<()> {
    match format {
        Format::Bml => {
            writeln!(writer, "{} {}", dataset.n_samples(), dataset.n_genes())?;
            writeln!(writer, "{}", dataset.labels().iter().join(" "))?;
        }
        Format::Capri => {
            writeln!(writer, "s\\g {}", dataset.labels().iter().join(" "))?;
        }
    }
    for entry in dataset.entries() {
        for sample in entry.samples() {
            writeln!(writer, "{} {}", sample, entry.genotype())?;
        }
    }
    writer.flush()?;
    Ok(())
}
