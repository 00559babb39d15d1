//! Lazy generator: images are built while iterating, negatives are sampled
//! on the fly for every pass.
use crate::data::control::ControlCdr3Source;
use crate::data::known_pairs::KnownPairs;
use crate::data::negatives::NegativeSampler;
use crate::data::stream::DataStream;
use crate::features::FeatureBuilder;
use crate::processing::dataset::{Dataset, ElementSpec, Example, ExampleIter};
use crate::processing::validate_pairs;
use crate::shared::errors::PipelineError;
use crate::shared::parameters::GeneratorParameters;
use crate::shared::sequence::{Label, SequencePair};
use anyhow::Result;
use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct PaddedBatchGenerator {
    stream: DataStream,
    // epitopes of the positive pairs, one entry per pair
    epitopes: Vec<String>,
    pool: Vec<String>,
    known: KnownPairs,
    builder: FeatureBuilder,
    params: GeneratorParameters,
    n_negatives: usize,
    passes: AtomicU64,
}

/// Build the lazy generator of `data_stream`.
///
/// Each pass emits every row of the stream, plus
/// `params.negatives_for(n_positives)` negatives whose CDR3 comes from
/// `negative_ref` (or from the positive CDR3s of the stream when `None`).
/// When negatives are sampled, the stream must only hold positives.
/// The order of positives and negatives is drawn anew for every pass.
pub fn padded_batch_generator(
    data_stream: &DataStream,
    feature_builder: &FeatureBuilder,
    params: &GeneratorParameters,
    negative_ref: Option<&ControlCdr3Source>,
) -> Result<PaddedBatchGenerator> {
    params.check()?;
    if data_stream.is_empty() {
        return Err(PipelineError::EmptySource("empty data stream".to_string()))?;
    }
    let pairs: Vec<SequencePair> = data_stream.iter().cloned().collect();
    validate_pairs(&pairs, feature_builder, params)?;

    let epitopes: Vec<String> = data_stream.positives().map(|p| p.epitope.clone()).collect();
    let n_negatives = params.negatives_for(epitopes.len());

    let mut known = KnownPairs::from_positives(data_stream.iter());
    if let Some(path) = &params.full_dataset_path {
        known.extend(&KnownPairs::load(path, &params.headers)?);
    }

    let candidates: Vec<String> = match negative_ref {
        Some(r) => r.cdr3s().to_vec(),
        None => data_stream.positives().map(|p| p.cdr3.clone()).unique().collect(),
    };
    let max_cdr3 = params.cdr3_range.1;
    let pool: Vec<String> = candidates
        .into_iter()
        .filter(|c| c.len() <= max_cdr3 && feature_builder.check_sequence(c).is_ok())
        .collect();

    if n_negatives > 0 {
        if data_stream.iter().any(|p| p.is_negative()) {
            return Err(PipelineError::invalid(
                "negatives are sampled on the fly but the data stream already holds negatives",
            ))?;
        }
        if epitopes.is_empty() {
            return Err(PipelineError::EmptySource(
                "no positive pair to derive negatives from".to_string(),
            ))?;
        }
        if pool.is_empty() {
            return Err(PipelineError::EmptySource(
                "no usable CDR3 for negative sampling".to_string(),
            ))?;
        }
    }
    log::info!(
        "Lazy generator: {} rows and {} sampled negatives per pass",
        pairs.len(),
        n_negatives
    );

    Ok(PaddedBatchGenerator {
        stream: data_stream.clone(),
        epitopes,
        pool,
        known,
        builder: feature_builder.clone(),
        params: params.clone(),
        n_negatives,
        passes: AtomicU64::new(0),
    })
}

impl PaddedBatchGenerator {
    fn pass_rng(&self) -> SmallRng {
        let pass = self.passes.fetch_add(1, Ordering::Relaxed);
        match self.params.seed {
            Some(s) => SmallRng::seed_from_u64(s.wrapping_add(pass)),
            None => SmallRng::from_entropy(),
        }
    }

    pub fn n_negatives(&self) -> usize {
        self.n_negatives
    }
}

enum Slot {
    Row,
    Negative,
}

struct BatchIter<'a> {
    generator: &'a PaddedBatchGenerator,
    rows: std::slice::Iter<'a, SequencePair>,
    schedule: std::vec::IntoIter<Slot>,
    sampler: Option<NegativeSampler<'a>>,
    rng: SmallRng,
}

impl BatchIter<'_> {
    fn negative(&mut self) -> Result<Example> {
        let generator = self.generator;
        let sampler = self
            .sampler
            .as_ref()
            .ok_or_else(|| PipelineError::EmptySource("no negative sampler".to_string()))?;
        let epitope = &generator.epitopes[self.rng.gen_range(0..generator.epitopes.len())];
        let cdr3 = sampler.sample(epitope, &mut self.rng)?;
        generator.example(cdr3, epitope, Label::Negative.as_int())
    }
}

impl Iterator for BatchIter<'_> {
    type Item = Result<Example>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.schedule.next()? {
            Slot::Row => {
                let p = self.rows.next()?;
                Some(
                    p.label_value()
                        .and_then(|label| self.generator.example(&p.cdr3, &p.epitope, label)),
                )
            }
            Slot::Negative => Some(self.negative()),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.schedule.size_hint()
    }
}

impl PaddedBatchGenerator {
    fn example(&self, cdr3: &str, epitope: &str, label: i64) -> Result<Example> {
        let (max_cdr3, max_epitope) = self.params.padded_shape();
        Ok(Example {
            image: self.builder.generate_image(cdr3, epitope, max_cdr3, max_epitope)?,
            label,
        })
    }
}

impl Dataset for PaddedBatchGenerator {
    fn iter(&self) -> ExampleIter<'_> {
        let mut rng = self.pass_rng();
        let mut schedule: Vec<Slot> = (0..self.stream.len())
            .map(|_| Slot::Row)
            .chain((0..self.n_negatives).map(|_| Slot::Negative))
            .collect();
        schedule.shuffle(&mut rng);

        let sampler = if self.n_negatives > 0 {
            NegativeSampler::new(&self.pool, &self.known).ok()
        } else {
            None
        };
        Box::new(BatchIter {
            generator: self,
            rows: self.stream.iter(),
            schedule: schedule.into_iter(),
            sampler,
            rng,
        })
    }

    fn element_spec(&self) -> ElementSpec {
        let (max_cdr3, max_epitope) = self.params.padded_shape();
        ElementSpec {
            image_shape: (max_cdr3, max_epitope, self.builder.num_features()),
        }
    }

    fn cardinality(&self) -> Option<usize> {
        Some(self.stream.len() + self.n_negatives)
    }
}
