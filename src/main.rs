//! Build padded TCR-epitope feature images from a CSV of pairs and print a
//! summary of the resulting dataset.
use anyhow::Result;
use clap::Parser;
use imrex_data::data::KnownPairs;
use imrex_data::features::{parse_features, parse_operator};
use imrex_data::{
    padded_batch_generator, padded_dataset_generator, ControlCdr3Source, DataStream, Dataset,
    FeatureBuilder, GeneratorParameters, LoggingConfig, SequenceSource,
};
use log::LevelFilter;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imrex-data")]
#[command(about = "Padded CDR3-epitope feature images", long_about = None)]
struct Cli {
    /// CSV (or TSV) of CDR3-epitope pairs
    input: PathBuf,

    /// Reference CDR3 pool (TSV with a CDR3_beta column) used for negatives
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Generator parameters (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated feature scales
    #[arg(long, default_value = "hydrophob,isoelectric,mass,hydrophil,charge")]
    features: String,

    /// Pairwise operator (prod, diff, absdiff)
    #[arg(long, default_value = "absdiff")]
    operator: String,

    /// Keep the raw operator values instead of rescaling them to [0, 1]
    #[arg(long)]
    no_normalize: bool,

    /// Sample negatives lazily at every pass instead of building the dataset up front
    #[arg(long)]
    lazy: bool,

    /// Number of passes over the lazy generator
    #[arg(long, default_value_t = 1)]
    passes: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut logging = LoggingConfig::default().with_level(level);
    if let Some(path) = &cli.log_file {
        logging = logging.with_file(path.clone());
    }
    logging.init()?;

    let mut params = match &cli.config {
        Some(path) => GeneratorParameters::load_json(path)?,
        None => GeneratorParameters::default(),
    };
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }
    params.check()?;

    let builder = FeatureBuilder::new(parse_features(&cli.features)?, parse_operator(&cli.operator)?)
        .with_normalization(!cli.no_normalize);

    let mut source = SequenceSource::load(&cli.input, &params.headers)?;
    if params.headers.label_header.is_none() {
        source.add_pos_labels()?;
    } else if source.negatives() > 0 {
        log::info!(
            "{} already holds {} negatives, none will be generated",
            source.name(),
            source.negatives()
        );
        params.neg_shuffle = false;
        params.neg_ratio = 0.;
    }

    let reference = match &cli.reference {
        Some(path) => Some(ControlCdr3Source::load(
            path,
            params.cdr3_range.0,
            params.cdr3_range.1,
        )?),
        None => None,
    };

    let summary = if cli.lazy {
        let stream = DataStream::new(&source);
        let generator = padded_batch_generator(&stream, &builder, &params, reference.as_ref())?;
        let mut pass_labels = Vec::with_capacity(cli.passes);
        for _ in 0..cli.passes {
            let labels = generator
                .iter()
                .map(|e| e.map(|e| e.label))
                .collect::<Result<Vec<_>>>()?;
            pass_labels.push(label_counts(&labels));
        }
        json!({
            "mode": "lazy",
            "source": source.name(),
            "rows": stream.len(),
            "negatives_per_pass": generator.n_negatives(),
            "cardinality": generator.cardinality(),
            "image_shape": generator.element_spec().image_shape,
            "passes": pass_labels,
        })
    } else {
        if let Some(reference) = &reference {
            let exclude = match &params.full_dataset_path {
                Some(path) => Some(KnownPairs::load(path, &params.headers)?),
                None => None,
            };
            let mut rng = match params.seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_entropy(),
            };
            source.generate_negatives_from_ref(reference, &mut rng, exclude.as_ref())?;
            params.neg_shuffle = false;
        }
        let stream = DataStream::new(&source);
        let dataset = padded_dataset_generator(&stream, &builder, &params)?;
        let labels: Vec<i64> = dataset.examples().iter().map(|e| e.label).collect();
        json!({
            "mode": "eager",
            "source": source.name(),
            "rows": stream.len(),
            "examples": dataset.len(),
            "image_shape": dataset.element_spec().image_shape,
            "labels": label_counts(&labels),
        })
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn label_counts(labels: &[i64]) -> serde_json::Value {
    let positives = labels.iter().filter(|&&l| l == 1).count();
    json!({
        "positive": positives,
        "negative": labels.len() - positives,
    })
}
