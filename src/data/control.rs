//! Reference pool of CDR3 sequences unrelated to the epitopes of interest
use crate::shared::parser::{delimiter_for, read_columns};
use crate::shared::sequence::is_amino_acid_sequence;
use anyhow::Result;
use itertools::Itertools;
use std::path::Path;

pub const DEFAULT_CONTROL_HEADER: &str = "CDR3_beta";

#[derive(Clone, Debug)]
pub struct ControlCdr3Source {
    name: String,
    cdr3s: Vec<String>,
    min_length: usize,
    max_length: usize,
}

impl ControlCdr3Source {
    /// Load the `CDR3_beta` column of `path`, keeping the distinct valid
    /// sequences whose length lies in [min_length, max_length]
    pub fn load(path: &Path, min_length: usize, max_length: usize) -> Result<ControlCdr3Source> {
        Self::load_with_header(path, DEFAULT_CONTROL_HEADER, min_length, max_length)
    }

    pub fn load_with_header(
        path: &Path,
        cdr3_header: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<ControlCdr3Source> {
        let records = read_columns(path, delimiter_for(path), &[cdr3_header])?;
        let source = Self::from_sequences(
            &path.display().to_string(),
            records.into_iter().map(|r| r.values[0].clone()),
            min_length,
            max_length,
        );
        Ok(source)
    }

    pub fn from_sequences(
        name: &str,
        sequences: impl IntoIterator<Item = String>,
        min_length: usize,
        max_length: usize,
    ) -> ControlCdr3Source {
        let mut dropped = 0;
        let cdr3s: Vec<String> = sequences
            .into_iter()
            .filter(|s| {
                let keep = is_amino_acid_sequence(s) && (min_length..=max_length).contains(&s.len());
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .unique()
            .collect();
        if dropped > 0 {
            log::debug!(
                "{}: {} reference CDR3s outside [{}, {}] or with non-standard residues",
                name,
                dropped,
                min_length,
                max_length
            );
        }
        ControlCdr3Source {
            name: name.to_string(),
            cdr3s,
            min_length,
            max_length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cdr3s(&self) -> &[String] {
        &self.cdr3s
    }

    pub fn len(&self) -> usize {
        self.cdr3s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cdr3s.is_empty()
    }

    pub fn length_range(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }
}
