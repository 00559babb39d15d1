use anyhow::Result;
use imrex_data::features::{parse_features, parse_operator};
use imrex_data::{FeatureBuilder, SequenceSource, SourceHeaders};
use std::fs;
use std::path::{Path, PathBuf};

#[allow(dead_code)]
pub const POSITIVES_CSV: &str = "cdr3,antigen.epitope
CASSLGQAYEQYF,GILGFVFTL
CASSIRSSYEQYF,NLVPMVATV
CASRPGLAGGRPEQYF,GLCTLVAML
CASSYSGGSYNEQFF,KLGGALQAK
CSARDRTGNGYTF,RAKFKQLL
";

#[allow(dead_code)]
pub const REFERENCE_TSV: &str = "CDR3_beta\tTRBV
CASSPTSGGQETQYF\tTRBV7-9
CASSLAPGATNEKLFF\tTRBV5-1
CASSQDRGNYGYTF\tTRBV4-1
CASSEGQGNQPQHF\tTRBV6-5
CASRGQGAYEQYF\tTRBV19
CASSLGQAYEQYF\tTRBV7-2
CAS\tTRBV2
CASSPTSGGQETQYFAAAAAAAA\tTRBV2
CASSXTSGGQETQYF\tTRBV3
CASSQDRGNYGYTF\tTRBV4-1
";

#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// The five positive pairs, labelled
#[allow(dead_code)]
pub fn positive_source(dir: &Path) -> Result<SequenceSource> {
    let path = write_file(dir, "positives.csv", POSITIVES_CSV)?;
    let mut source = SequenceSource::load(&path, &SourceHeaders::default())?;
    source.add_pos_labels()?;
    Ok(source)
}

#[allow(dead_code)]
pub fn five_feature_builder() -> Result<FeatureBuilder> {
    Ok(FeatureBuilder::new(
        parse_features("hydrophob,isoelectric,mass,hydrophil,charge")?,
        parse_operator("absdiff")?,
    ))
}

#[allow(dead_code)]
pub fn label_counts(labels: &[i64]) -> (usize, usize) {
    let pos = labels.iter().filter(|&&l| l == 1).count();
    (pos, labels.len() - pos)
}
