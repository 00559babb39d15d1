//! Basic sequence types: labelled CDR3/epitope pairs and amino-acid checks
use crate::shared::errors::PipelineError;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// The 20 standard amino acids, in one-letter code
pub const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Integer value of the label (0 or 1), as fed to the model
    pub fn as_int(&self) -> i64 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    pub fn from_int(value: i64) -> Option<Label> {
        match value {
            0 => Some(Label::Negative),
            1 => Some(Label::Positive),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequencePair {
    pub cdr3: String,
    pub epitope: String,
    // None until labels are attached to the source
    pub label: Option<Label>,
}

impl SequencePair {
    pub fn new(cdr3: &str, epitope: &str, label: Option<Label>) -> SequencePair {
        SequencePair {
            cdr3: cdr3.to_string(),
            epitope: epitope.to_string(),
            label,
        }
    }

    pub fn positive(cdr3: &str, epitope: &str) -> SequencePair {
        SequencePair::new(cdr3, epitope, Some(Label::Positive))
    }

    pub fn negative(cdr3: &str, epitope: &str) -> SequencePair {
        SequencePair::new(cdr3, epitope, Some(Label::Negative))
    }

    pub fn is_positive(&self) -> bool {
        self.label == Some(Label::Positive)
    }

    pub fn is_negative(&self) -> bool {
        self.label == Some(Label::Negative)
    }

    /// Integer label fed to the model; `Unlabeled` if none was attached
    pub fn label_value(&self) -> Result<i64> {
        match self.label {
            Some(l) => Ok(l.as_int()),
            None => Err(PipelineError::Unlabeled {
                cdr3: self.cdr3.clone(),
                epitope: self.epitope.clone(),
            })?,
        }
    }
}

impl fmt::Display for SequencePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label {
            Some(l) => write!(f, "{}/{} ({})", self.cdr3, self.epitope, l.as_int()),
            None => write!(f, "{}/{}", self.cdr3, self.epitope),
        }
    }
}

fn amino_acid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ACDEFGHIKLMNPQRSTVWY]+$").unwrap())
}

/// True if `seq` is a non-empty string of standard amino acids
/// ```
/// use imrex_data::shared::sequence::is_amino_acid_sequence;
/// assert!(is_amino_acid_sequence("CASSLGQAYEQYF"));
/// assert!(!is_amino_acid_sequence("CASS*GQ"));
/// assert!(!is_amino_acid_sequence(""));
/// ```
pub fn is_amino_acid_sequence(seq: &str) -> bool {
    amino_acid_regex().is_match(seq)
}
