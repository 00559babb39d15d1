//! The structs used for specifying the parameters of the generators
use crate::data::source::SourceHeaders;
use crate::shared::errors::PipelineError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorParameters {
    // (min, max) lengths; images are padded to the max
    pub cdr3_range: (usize, usize),
    pub epitope_range: (usize, usize),
    // fraction of negatives among the emitted examples (lazy generator)
    pub neg_ratio: f64,
    // generate shuffled negatives (eager generator); if false the
    // stream is expected to already contain its negatives
    pub neg_shuffle: bool,
    // pairs of this file are never used as negatives
    pub full_dataset_path: Option<PathBuf>,
    pub headers: SourceHeaders,
    pub seed: Option<u64>,
}

impl Default for GeneratorParameters {
    fn default() -> GeneratorParameters {
        GeneratorParameters {
            cdr3_range: (10, 20),
            epitope_range: (8, 11),
            neg_ratio: 0.5,
            neg_shuffle: true,
            full_dataset_path: None,
            headers: SourceHeaders::default(),
            seed: None,
        }
    }
}

impl GeneratorParameters {
    pub fn new(cdr3_range: (usize, usize), epitope_range: (usize, usize)) -> Self {
        Self {
            cdr3_range,
            epitope_range,
            ..Default::default()
        }
    }

    pub fn check(&self) -> Result<()> {
        for (name, (min, max)) in [("cdr3_range", self.cdr3_range), ("epitope_range", self.epitope_range)] {
            if max == 0 || min > max {
                return Err(PipelineError::invalid(format!(
                    "{} ({}, {}) is empty",
                    name, min, max
                )))?;
            }
        }
        if !(0.0..1.0).contains(&self.neg_ratio) {
            return Err(PipelineError::invalid(format!(
                "neg_ratio must lie in [0, 1), got {}",
                self.neg_ratio
            )))?;
        }
        Ok(())
    }

    /// Shape (cdr3_max, epitope_max) every image is padded to
    pub fn padded_shape(&self) -> (usize, usize) {
        (self.cdr3_range.1, self.epitope_range.1)
    }

    /// Number of negatives matching `n_positives` under `neg_ratio`
    /// ```
    /// use imrex_data::GeneratorParameters;
    /// let p = GeneratorParameters::default();
    /// assert_eq!(p.negatives_for(5), 5);
    /// ```
    pub fn negatives_for(&self, n_positives: usize) -> usize {
        (n_positives as f64 * self.neg_ratio / (1. - self.neg_ratio)).round() as usize
    }

    pub fn load_json(filename: &Path) -> Result<GeneratorParameters> {
        let content = fs::read_to_string(filename)
            .map_err(|e| anyhow!("Unable to read {}: {}", filename.display(), e))?;
        let params: GeneratorParameters = serde_json::from_str(&content)?;
        params.check()?;
        Ok(params)
    }

    pub fn save_json(&self, filename: &Path) -> Result<()> {
        fs::write(filename, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
