//! Build the interaction image of a CDR3/epitope pair
use crate::features::operator::Operator;
use crate::features::scale::FeatureScale;
use crate::shared::errors::PipelineError;
use anyhow::Result;
use itertools::iproduct;
use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};

/// Combine a list of scales with one operator into a stack of 2D maps.
///
/// The image of (cdr3, epitope) has one row per CDR3 residue and one
/// column per epitope residue; each layer corresponds to one scale, in
/// the order given at construction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureBuilder {
    pub features: Vec<FeatureScale>,
    pub operator: Operator,
    // rescale every layer to [0, 1] with the operator bounds
    pub normalize: bool,
    pub pad_value: f64,
}

impl FeatureBuilder {
    pub fn new(features: Vec<FeatureScale>, operator: Operator) -> FeatureBuilder {
        FeatureBuilder {
            features,
            operator,
            normalize: true,
            pad_value: 0.,
        }
    }

    pub fn with_normalization(mut self, normalize: bool) -> FeatureBuilder {
        self.normalize = normalize;
        self
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Check that every residue of `seq` is known to all the scales
    pub fn check_sequence(&self, seq: &str) -> Result<()> {
        for f in &self.features {
            f.values(seq)?;
        }
        Ok(())
    }

    /// Unpadded map of one scale, shape (cdr3.len(), epitope.len())
    pub fn feature_matrix(&self, scale: &FeatureScale, cdr3: &str, epitope: &str) -> Result<Array2<f64>> {
        let x = scale.values(cdr3)?;
        let y = scale.values(epitope)?;
        let mut m = Array2::<f64>::zeros((x.len(), y.len()));
        for (ii, jj) in iproduct!(0..x.len(), 0..y.len()) {
            let v = self.operator.apply(x[ii], y[jj]);
            m[[ii, jj]] = if self.normalize {
                self.operator.normalize(v, scale)
            } else {
                v
            };
        }
        Ok(m)
    }

    /// Padded image of shape (max_cdr3_len, max_epitope_len, num_features)
    pub fn generate_image(
        &self,
        cdr3: &str,
        epitope: &str,
        max_cdr3_len: usize,
        max_epitope_len: usize,
    ) -> Result<Array3<f64>> {
        if cdr3.len() > max_cdr3_len {
            return Err(PipelineError::range(cdr3, max_cdr3_len))?;
        }
        if epitope.len() > max_epitope_len {
            return Err(PipelineError::range(epitope, max_epitope_len))?;
        }

        let (top, left) = (
            (max_cdr3_len - cdr3.len()) / 2,
            (max_epitope_len - epitope.len()) / 2,
        );
        let mut image = Array3::<f64>::from_elem(
            (max_cdr3_len, max_epitope_len, self.num_features()),
            self.pad_value,
        );
        for (kk, scale) in self.features.iter().enumerate() {
            let m = self.feature_matrix(scale, cdr3, epitope)?;
            image
                .slice_mut(s![top..top + cdr3.len(), left..left + epitope.len(), kk])
                .assign(&m);
        }
        Ok(image)
    }
}
