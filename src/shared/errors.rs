//! Error taxonomy of the pipeline.
//!
//! Library functions return `anyhow::Result`; the variants below are the
//! typed causes and can be recovered with `err.downcast_ref::<PipelineError>()`.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Bad file schema or a row missing a required field
    #[error("malformed input in {source_name}: {message}")]
    MalformedInput {
        source_name: String,
        message: String,
    },

    /// Amino acid absent from a feature scale's table
    #[error("unknown residue '{residue}' for scale {scale}")]
    UnknownResidue { residue: char, scale: String },

    /// Sequence longer than the declared maximum
    #[error("sequence {sequence} has length {length}, above the maximum {max}")]
    RangeViolation {
        sequence: String,
        length: usize,
        max: usize,
    },

    #[error("no rows to stream: {0}")]
    EmptySource(String),

    /// One-shot operation invoked a second time
    #[error("{0} was already applied to this source")]
    RepeatedOperation(&'static str),

    #[error("pair {cdr3}/{epitope} carries no label")]
    Unlabeled { cdr3: String, epitope: String },

    /// Every candidate CDR3 is a known binder of the epitope
    #[error("no negative CDR3 candidate left for epitope {epitope}")]
    NoNegativeCandidate { epitope: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("structure error: {0}")]
    Structure(String),
}

impl PipelineError {
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::MalformedInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn range(sequence: &str, max: usize) -> Self {
        PipelineError::RangeViolation {
            sequence: sequence.to_string(),
            length: sequence.len(),
            max,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        PipelineError::InvalidParameter(message.into())
    }

    pub fn structure(message: impl Into<String>) -> Self {
        PipelineError::Structure(message.into())
    }
}
