#![warn(clippy::large_types_passed_by_value)]
//! Padded TCR-epitope feature images for interaction prediction.
//!
//! Sequence pairs are loaded from CSV sources, completed with negative pairs
//! (shuffled within the source or drawn from a reference CDR3 pool), and
//! turned into padded (cdr3, epitope, feature) images by a
//! [`FeatureBuilder`]. Two generators are available: an eager
//! [`PaddedDataset`] and a lazy [`PaddedBatchGenerator`] that samples its
//! negatives anew at every pass.

pub mod data;
pub mod features;
pub mod interpret;
pub mod processing;
pub mod shared;

pub use crate::data::{ControlCdr3Source, DataStream, KnownPairs, SequenceSource, SourceHeaders};
pub use crate::features::{FeatureBuilder, FeatureScale, Operator};
pub use crate::processing::{
    padded_batch_generator, padded_dataset_generator, Dataset, Example, PaddedBatchGenerator,
    PaddedDataset,
};
pub use crate::shared::{GeneratorParameters, Label, LoggingConfig, PipelineError, SequencePair};
