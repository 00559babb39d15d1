//! Eager generator: every image is built up front and kept in memory
use crate::data::known_pairs::KnownPairs;
use crate::data::source::SequenceSource;
use crate::data::stream::DataStream;
use crate::features::FeatureBuilder;
use crate::processing::dataset::{Dataset, ElementSpec, Example, ExampleIter};
use crate::processing::validate_pairs;
use crate::shared::errors::PipelineError;
use crate::shared::parameters::GeneratorParameters;
use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Array-backed dataset; iterating never fails and never changes the
/// content or order of the examples.
#[derive(Clone, Debug)]
pub struct PaddedDataset {
    examples: Arc<[Example]>,
    spec: ElementSpec,
}

impl PaddedDataset {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

impl Dataset for PaddedDataset {
    fn iter(&self) -> ExampleIter<'_> {
        Box::new(self.examples.iter().cloned().map(Ok))
    }

    fn element_spec(&self) -> ElementSpec {
        self.spec
    }

    fn cardinality(&self) -> Option<usize> {
        Some(self.examples.len())
    }
}

/// Build the padded dataset of `data_stream`.
///
/// With `neg_shuffle`, one shuffled negative is added per positive pair
/// (true pairs of the stream and of `full_dataset_path` excluded) and the
/// stream may not hold negatives of its own. Otherwise the stream must
/// already hold its negatives.
pub fn padded_dataset_generator(
    data_stream: &DataStream,
    feature_builder: &FeatureBuilder,
    params: &GeneratorParameters,
) -> Result<PaddedDataset> {
    params.check()?;
    if data_stream.is_empty() {
        return Err(PipelineError::EmptySource("empty data stream".to_string()))?;
    }

    let pairs = if params.neg_shuffle {
        if data_stream.iter().any(|p| p.is_negative()) {
            return Err(PipelineError::invalid(
                "neg_shuffle is set but the data stream already holds negatives",
            ))?;
        }
        let exclude = match &params.full_dataset_path {
            Some(path) => Some(KnownPairs::load(path, &params.headers)?),
            None => None,
        };
        let mut rng = match params.seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
        // negatives only come from the positives of the stream
        let positives = data_stream.positives().cloned().collect();
        let mut source = SequenceSource::from_pairs("data stream", positives);
        source.generate_negatives_from_shuffle(&mut rng, exclude.as_ref())?;
        source.pairs().to_vec()
    } else {
        data_stream.iter().cloned().collect::<Vec<_>>()
    };

    validate_pairs(&pairs, feature_builder, params)?;

    let (max_cdr3, max_epitope) = params.padded_shape();
    let mut examples = Vec::with_capacity(pairs.len());
    for p in &pairs {
        let image = feature_builder.generate_image(&p.cdr3, &p.epitope, max_cdr3, max_epitope)?;
        examples.push(Example {
            image,
            label: p.label_value()?,
        });
    }
    log::info!(
        "Built {} padded examples of shape ({}, {}, {})",
        examples.len(),
        max_cdr3,
        max_epitope,
        feature_builder.num_features()
    );

    Ok(PaddedDataset {
        examples: examples.into(),
        spec: ElementSpec {
            image_shape: (max_cdr3, max_epitope, feature_builder.num_features()),
        },
    })
}
