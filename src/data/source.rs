//! Labelled CDR3/epitope pairs read from a delimited file (VDJdb style)
use crate::data::control::ControlCdr3Source;
use crate::data::known_pairs::KnownPairs;
use crate::data::negatives::NegativeSampler;
use crate::shared::errors::PipelineError;
use crate::shared::parser::{delimiter_for, read_columns};
use crate::shared::sequence::{Label, SequencePair};
use anyhow::Result;
use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the columns to read
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceHeaders {
    pub cdr3_header: String,
    pub epitope_header: String,
    // when given, labels (0/1) are read from this column
    pub label_header: Option<String>,
}

impl Default for SourceHeaders {
    fn default() -> SourceHeaders {
        SourceHeaders {
            cdr3_header: "cdr3".to_string(),
            epitope_header: "antigen.epitope".to_string(),
            label_header: None,
        }
    }
}

impl SourceHeaders {
    pub fn new(cdr3_header: &str, epitope_header: &str) -> SourceHeaders {
        SourceHeaders {
            cdr3_header: cdr3_header.to_string(),
            epitope_header: epitope_header.to_string(),
            label_header: None,
        }
    }

    pub fn with_label(mut self, label_header: &str) -> SourceHeaders {
        self.label_header = Some(label_header.to_string());
        self
    }
}

/// Where the negatives of a source came from, once generated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NegativeOrigin {
    Shuffle,
    Reference,
}

#[derive(Clone, Debug)]
pub struct SequenceSource {
    name: String,
    pairs: Vec<SequencePair>,
    negatives: Option<NegativeOrigin>,
}

impl SequenceSource {
    /// Read the pairs of `path`. Delimiter is inferred from the extension.
    pub fn load(path: &Path, headers: &SourceHeaders) -> Result<SequenceSource> {
        Self::load_with_delimiter(path, headers, delimiter_for(path))
    }

    pub fn load_with_delimiter(
        path: &Path,
        headers: &SourceHeaders,
        delimiter: u8,
    ) -> Result<SequenceSource> {
        let name = path.display().to_string();
        let mut columns = vec![headers.cdr3_header.as_str(), headers.epitope_header.as_str()];
        if let Some(l) = &headers.label_header {
            columns.push(l.as_str());
        }
        let records = read_columns(path, delimiter, &columns)?;

        let mut pairs = Vec::with_capacity(records.len());
        for r in records {
            let label = match r.values.get(2) {
                None => None,
                Some(v) => Some(
                    v.parse::<i64>()
                        .ok()
                        .and_then(Label::from_int)
                        .ok_or_else(|| {
                            PipelineError::malformed(
                                &name,
                                format!("invalid label '{}' on line {}", v, r.line),
                            )
                        })?,
                ),
            };
            pairs.push(SequencePair::new(&r.values[0], &r.values[1], label));
        }
        log::debug!("Loaded {} pairs from {}", pairs.len(), name);
        Ok(SequenceSource {
            name,
            pairs,
            negatives: None,
        })
    }

    pub fn from_pairs(name: &str, pairs: Vec<SequencePair>) -> SequenceSource {
        SequenceSource {
            name: name.to_string(),
            pairs,
            negatives: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pairs(&self) -> &[SequencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_positive()).count()
    }

    pub fn negatives(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_negative()).count()
    }

    pub fn negative_origin(&self) -> Option<NegativeOrigin> {
        self.negatives
    }

    /// Distinct epitopes, in order of first appearance
    pub fn epitopes(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.epitope.as_str()).unique().collect()
    }

    /// Tag every pair as positive. Can only be applied to unlabelled rows, once.
    pub fn add_pos_labels(&mut self) -> Result<()> {
        if self.pairs.iter().any(|p| p.label.is_some()) {
            return Err(PipelineError::RepeatedOperation("add_pos_labels"))?;
        }
        self.pairs
            .iter_mut()
            .for_each(|p| p.label = Some(Label::Positive));
        Ok(())
    }

    fn check_negatives_allowed(&self) -> Result<()> {
        if self.negatives.is_some() || self.negatives() > 0 {
            return Err(PipelineError::RepeatedOperation("negative generation"))?;
        }
        if let Some(p) = self.pairs.iter().find(|p| p.label.is_none()) {
            return Err(PipelineError::Unlabeled {
                cdr3: p.cdr3.clone(),
                epitope: p.epitope.clone(),
            })?;
        }
        if self.positives() == 0 {
            return Err(PipelineError::EmptySource(format!(
                "{} has no positive pair",
                self.name
            )))?;
        }
        Ok(())
    }

    /// True pairings of the source, merged with `exclude` when given
    fn true_pairs(&self, exclude: Option<&KnownPairs>) -> KnownPairs {
        let mut known = KnownPairs::from_positives(&self.pairs);
        if let Some(ex) = exclude {
            known.extend(ex);
        }
        known
    }

    fn append_negatives<R: Rng>(
        &mut self,
        pool: &[String],
        known: &KnownPairs,
        rng: &mut R,
    ) -> Result<usize> {
        let sampler = NegativeSampler::new(pool, known)?;
        let mut negatives = Vec::with_capacity(self.pairs.len());
        for p in self.pairs.iter().filter(|p| p.is_positive()) {
            let cdr3 = sampler.sample(&p.epitope, rng)?;
            negatives.push(SequencePair::negative(cdr3, &p.epitope));
        }
        let n = negatives.len();
        self.pairs.extend(negatives);
        Ok(n)
    }

    /// One negative per positive pair: its epitope paired with another CDR3 of
    /// the source. Pairs in the source or in `exclude` are never produced.
    /// Returns the number of negatives added.
    pub fn generate_negatives_from_shuffle<R: Rng>(
        &mut self,
        rng: &mut R,
        exclude: Option<&KnownPairs>,
    ) -> Result<usize> {
        self.check_negatives_allowed()?;
        let known = self.true_pairs(exclude);
        // distinct CDR3s, each equally likely whatever its count in the source
        let pool: Vec<String> = self
            .pairs
            .iter()
            .map(|p| p.cdr3.clone())
            .unique()
            .collect();
        let n = self.append_negatives(&pool, &known, rng)?;
        self.negatives = Some(NegativeOrigin::Shuffle);
        log::info!("Generated {} shuffled negatives for {}", n, self.name);
        Ok(n)
    }

    /// One negative per positive pair: its epitope paired with a CDR3 of the
    /// reference pool.
    pub fn generate_negatives_from_ref<R: Rng>(
        &mut self,
        reference: &ControlCdr3Source,
        rng: &mut R,
        exclude: Option<&KnownPairs>,
    ) -> Result<usize> {
        self.check_negatives_allowed()?;
        let known = self.true_pairs(exclude);
        let n = self.append_negatives(reference.cdr3s(), &known, rng)?;
        self.negatives = Some(NegativeOrigin::Reference);
        log::info!(
            "Generated {} negatives for {} from reference {}",
            n,
            self.name,
            reference.name()
        );
        Ok(n)
    }
}
