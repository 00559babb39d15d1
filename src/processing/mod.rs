//! Padded (image, label) generators and the dataset stages around them
pub mod dataset;
pub mod padded_batch;
pub mod padded_dataset;

pub use dataset::{Batch, Batched, Dataset, ElementSpec, Example, Shuffled};
pub use padded_batch::{padded_batch_generator, PaddedBatchGenerator};
pub use padded_dataset::{padded_dataset_generator, PaddedDataset};

use crate::features::FeatureBuilder;
use crate::shared::errors::PipelineError;
use crate::shared::parameters::GeneratorParameters;
use crate::shared::sequence::SequencePair;
use anyhow::Result;

/// Every pair is labelled, fits the padded shape and only holds residues
/// known to the feature scales.
pub(crate) fn validate_pairs(
    pairs: &[SequencePair],
    builder: &FeatureBuilder,
    params: &GeneratorParameters,
) -> Result<()> {
    let (max_cdr3, max_epitope) = params.padded_shape();
    for p in pairs {
        if p.label.is_none() {
            return Err(PipelineError::Unlabeled {
                cdr3: p.cdr3.clone(),
                epitope: p.epitope.clone(),
            })?;
        }
        if p.cdr3.len() > max_cdr3 {
            return Err(PipelineError::range(&p.cdr3, max_cdr3))?;
        }
        if p.epitope.len() > max_epitope {
            return Err(PipelineError::range(&p.epitope, max_epitope))?;
        }
        builder.check_sequence(&p.cdr3)?;
        builder.check_sequence(&p.epitope)?;
    }
    Ok(())
}
