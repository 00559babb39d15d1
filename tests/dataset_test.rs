mod common;

use anyhow::Result;
use common::{five_feature_builder, label_counts, positive_source, write_file, REFERENCE_TSV};
use imrex_data::processing::Batch;
use imrex_data::{
    padded_batch_generator, padded_dataset_generator, ControlCdr3Source, DataStream, Dataset,
    GeneratorParameters, PipelineError, SequencePair,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[test]
fn padded_dataset_shuffle_negatives() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let stream = DataStream::new(&source);
    let mut params = GeneratorParameters::new((10, 20), (8, 11));
    params.seed = Some(3);

    let dataset = padded_dataset_generator(&stream, &five_feature_builder()?, &params)?;
    assert_eq!(dataset.len(), 10);
    assert_eq!(dataset.element_spec().image_shape, (20, 11, 5));
    assert_eq!(dataset.cardinality(), Some(10));
    for ex in dataset.examples() {
        assert_eq!(ex.image.dim(), (20, 11, 5));
    }
    let labels: Vec<i64> = dataset.examples().iter().map(|e| e.label).collect();
    assert_eq!(label_counts(&labels), (5, 5));

    // iterating twice gives the same content, in the same order
    assert_eq!(dataset.collect_pass()?, dataset.collect_pass()?);
    Ok(())
}

#[test]
fn padded_dataset_reference_negatives() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut source = positive_source(dir.path())?;
    let ref_path = write_file(dir.path(), "reference.tsv", REFERENCE_TSV)?;
    let reference = ControlCdr3Source::load(&ref_path, 10, 20)?;
    let mut rng = SmallRng::seed_from_u64(7);
    source.generate_negatives_from_ref(&reference, &mut rng, None)?;

    let mut params = GeneratorParameters::new((10, 20), (8, 11));
    params.neg_shuffle = false;
    let dataset = padded_dataset_generator(&DataStream::new(&source), &five_feature_builder()?, &params)?;
    assert_eq!(dataset.len(), 10);
    let labels: Vec<i64> = dataset.examples().iter().map(|e| e.label).collect();
    assert_eq!(label_counts(&labels), (5, 5));

    let pool: HashSet<&str> = reference.cdr3s().iter().map(String::as_str).collect();
    for p in source.pairs().iter().filter(|p| p.is_negative()) {
        assert!(pool.contains(p.cdr3.as_str()));
    }
    Ok(())
}

#[test]
fn shuffled_passes_differ() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let mut params = GeneratorParameters::default();
    params.seed = Some(11);
    let dataset = padded_dataset_generator(&DataStream::new(&source), &five_feature_builder()?, &params)?
        .shuffle(10, Some(42), true);

    let mut orders = HashSet::new();
    for _ in 0..6 {
        let labels: Vec<i64> = dataset.iter().map(|e| e.map(|e| e.label)).collect::<Result<_>>()?;
        assert_eq!(label_counts(&labels), (5, 5));
        orders.insert(labels);
    }
    assert!(orders.len() > 1);
    Ok(())
}

#[test]
fn batches_of_padded_examples() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let dataset = padded_dataset_generator(
        &DataStream::new(&source),
        &five_feature_builder()?,
        &GeneratorParameters::default(),
    )?
    .batch(4);
    assert_eq!(dataset.cardinality(), Some(3));

    let batches: Vec<Batch> = dataset.iter().collect::<Result<_>>()?;
    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert_eq!(batches[0].images.dim(), (4, 20, 11, 5));
    assert_eq!(batches[2].labels.len(), 2);
    Ok(())
}

#[test]
fn lazy_generator_resamples_every_pass() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let ref_path = write_file(dir.path(), "reference.tsv", REFERENCE_TSV)?;
    let reference = ControlCdr3Source::load(&ref_path, 10, 20)?;
    let mut params = GeneratorParameters::default();
    params.seed = Some(5);

    let generator = padded_batch_generator(
        &DataStream::new(&source),
        &five_feature_builder()?,
        &params,
        Some(&reference),
    )?;
    assert_eq!(generator.n_negatives(), 5);
    assert_eq!(generator.cardinality(), Some(10));
    assert_eq!(generator.element_spec().image_shape, (20, 11, 5));

    let mut orders = HashSet::new();
    for _ in 0..6 {
        let pass = generator.collect_pass()?;
        assert_eq!(pass.len(), 10);
        assert!(pass.iter().all(|e| e.image.dim() == (20, 11, 5)));
        let labels: Vec<i64> = pass.iter().map(|e| e.label).collect();
        assert_eq!(label_counts(&labels), (5, 5));
        orders.insert(labels);
    }
    assert!(orders.len() > 1);
    Ok(())
}

#[test]
fn lazy_generator_without_negatives() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let mut params = GeneratorParameters::default();
    params.neg_ratio = 0.;
    let generator = padded_batch_generator(&DataStream::new(&source), &five_feature_builder()?, &params, None)?;
    assert_eq!(generator.n_negatives(), 0);
    assert!(generator.collect_pass()?.iter().all(|e| e.label == 1));
    Ok(())
}

#[test]
fn too_long_sequences_are_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let params = GeneratorParameters::new((10, 14), (8, 11));

    let err = padded_dataset_generator(&DataStream::new(&source), &five_feature_builder()?, &params)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::RangeViolation { max: 14, .. })
    ));
    Ok(())
}

#[test]
fn empty_stream_is_rejected() -> Result<()> {
    let stream = DataStream::from_pairs(vec![]);
    let err = padded_dataset_generator(&stream, &five_feature_builder()?, &GeneratorParameters::default())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::EmptySource(_))
    ));
    Ok(())
}

#[test]
fn unlabelled_rows_are_rejected() -> Result<()> {
    let stream = DataStream::from_pairs(vec![SequencePair::new("CASSLGQAYEQYF", "GILGFVFTL", None)]);
    let mut params = GeneratorParameters::default();
    params.neg_shuffle = false;
    let err = padded_dataset_generator(&stream, &five_feature_builder()?, &params).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Unlabeled { .. })
    ));
    Ok(())
}

fn assert_invalid_parameter(err: &anyhow::Error) {
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidParameter(_))
    ));
}

#[test]
fn stream_negatives_are_not_stacked_with_sampled_ones() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut source = positive_source(dir.path())?;
    let ref_path = write_file(dir.path(), "reference.tsv", REFERENCE_TSV)?;
    let reference = ControlCdr3Source::load(&ref_path, 10, 20)?;
    let mut rng = SmallRng::seed_from_u64(2);
    source.generate_negatives_from_ref(&reference, &mut rng, None)?;
    let stream = DataStream::new(&source);
    let builder = five_feature_builder()?;

    // lazy: sampling on top of the stream's negatives would give 3 x positives
    let err = padded_batch_generator(&stream, &builder, &GeneratorParameters::default(), Some(&reference))
        .map(|_| ())
        .unwrap_err();
    assert_invalid_parameter(&err);

    let mut params = GeneratorParameters::default();
    params.neg_ratio = 0.;
    let generator = padded_batch_generator(&stream, &builder, &params, Some(&reference))?;
    let labels: Vec<i64> = generator.collect_pass()?.iter().map(|e| e.label).collect();
    assert_eq!(label_counts(&labels), (5, 5));

    // eager: shuffled negatives on top of the stream's negatives
    let err = padded_dataset_generator(&stream, &builder, &GeneratorParameters::default())
        .map(|_| ())
        .unwrap_err();
    assert_invalid_parameter(&err);
    Ok(())
}

#[test]
fn unseeded_shuffle_keeps_its_order_without_reshuffle() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let dataset = padded_dataset_generator(
        &DataStream::new(&source),
        &five_feature_builder()?,
        &GeneratorParameters::default(),
    )?;
    let originals = dataset.examples().to_vec();
    let shuffled = dataset.shuffle(10, None, false);

    let mut orders = HashSet::new();
    for _ in 0..6 {
        let pass = shuffled.collect_pass()?;
        let order: Vec<usize> = pass
            .iter()
            .map(|e| originals.iter().position(|o| o == e).unwrap_or(usize::MAX))
            .collect();
        assert!(order.iter().all(|&i| i < originals.len()));
        orders.insert(order);
    }
    assert_eq!(orders.len(), 1);
    Ok(())
}

/// Binds four of the reference CDR3s and three of the positive CDR3s to
/// GILGFVFTL
const FULL_DATASET_CSV: &str = "cdr3,antigen.epitope
CASSPTSGGQETQYF,GILGFVFTL
CASSLAPGATNEKLFF,GILGFVFTL
CASSQDRGNYGYTF,GILGFVFTL
CASSEGQGNQPQHF,GILGFVFTL
CASSIRSSYEQYF,GILGFVFTL
CASRPGLAGGRPEQYF,GILGFVFTL
CASSYSGGSYNEQFF,GILGFVFTL
";

/// Images of every true pair: the positives and the full dataset rows
fn true_pair_images(
    builder: &imrex_data::FeatureBuilder,
    source: &imrex_data::SequenceSource,
) -> Result<Vec<ndarray::Array3<f64>>> {
    let mut images = Vec::new();
    let full = FULL_DATASET_CSV.lines().skip(1).filter_map(|l| l.split_once(','));
    let positives = source
        .pairs()
        .iter()
        .map(|p| (p.cdr3.as_str(), p.epitope.as_str()));
    for (cdr3, epitope) in full.chain(positives) {
        images.push(builder.generate_image(cdr3, epitope, 20, 11)?);
    }
    Ok(images)
}

#[test]
fn eager_generator_excludes_full_dataset_pairs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let builder = five_feature_builder()?;
    let mut params = GeneratorParameters::default();
    params.full_dataset_path = Some(write_file(dir.path(), "full.csv", FULL_DATASET_CSV)?);
    let excluded = true_pair_images(&builder, &source)?;

    for seed in 0..5 {
        params.seed = Some(seed);
        let dataset = padded_dataset_generator(&DataStream::new(&source), &builder, &params)?;
        // negatives follow the positives, one per positive and in the same order
        let negatives = &dataset.examples()[5..];
        assert!(negatives.iter().all(|e| e.label == 0));
        for e in negatives {
            assert!(!excluded.contains(&e.image));
        }
        // the only CDR3 left for GILGFVFTL
        assert_eq!(
            negatives[0].image,
            builder.generate_image("CSARDRTGNGYTF", "GILGFVFTL", 20, 11)?
        );
    }
    Ok(())
}

#[test]
fn lazy_generator_excludes_full_dataset_pairs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = positive_source(dir.path())?;
    let ref_path = write_file(dir.path(), "reference.tsv", REFERENCE_TSV)?;
    let reference = ControlCdr3Source::load(&ref_path, 10, 20)?;
    let builder = five_feature_builder()?;
    let mut params = GeneratorParameters::default();
    params.seed = Some(8);
    params.full_dataset_path = Some(write_file(dir.path(), "full.csv", FULL_DATASET_CSV)?);
    let excluded = true_pair_images(&builder, &source)?;

    let generator = padded_batch_generator(&DataStream::new(&source), &builder, &params, Some(&reference))?;
    for _ in 0..10 {
        for e in generator.collect_pass()?.iter().filter(|e| e.label == 0) {
            assert!(!excluded.contains(&e.image));
        }
    }
    Ok(())
}
