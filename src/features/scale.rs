//! Per-amino-acid physico-chemical scales
use crate::shared::amino_acids::{
    CHARGE, EMINI_SURFACE, HOPP_WOODS, ISOELECTRIC_POINT, KYTE_DOOLITTLE, RESIDUE_MASS,
};
use crate::shared::errors::PipelineError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureScale {
    Hydrophobicity,
    Hydrophilicity,
    IsoelectricPoint,
    Mass,
    Charge,
    Surface,
}

impl FeatureScale {
    pub const ALL: [FeatureScale; 6] = [
        FeatureScale::Hydrophobicity,
        FeatureScale::Hydrophilicity,
        FeatureScale::IsoelectricPoint,
        FeatureScale::Mass,
        FeatureScale::Charge,
        FeatureScale::Surface,
    ];

    /// Short name, as used in feature lists ("hydrophob,isoelectric,...")
    pub fn name(&self) -> &'static str {
        match self {
            FeatureScale::Hydrophobicity => "hydrophob",
            FeatureScale::Hydrophilicity => "hydrophil",
            FeatureScale::IsoelectricPoint => "isoelectric",
            FeatureScale::Mass => "mass",
            FeatureScale::Charge => "charge",
            FeatureScale::Surface => "surface",
        }
    }

    fn table(&self) -> &'static phf::Map<u8, f64> {
        match self {
            FeatureScale::Hydrophobicity => &KYTE_DOOLITTLE,
            FeatureScale::Hydrophilicity => &HOPP_WOODS,
            FeatureScale::IsoelectricPoint => &ISOELECTRIC_POINT,
            FeatureScale::Mass => &RESIDUE_MASS,
            FeatureScale::Charge => &CHARGE,
            FeatureScale::Surface => &EMINI_SURFACE,
        }
    }

    pub fn value(&self, residue: u8) -> Result<f64> {
        self.table().get(&residue).copied().ok_or_else(|| {
            PipelineError::UnknownResidue {
                residue: residue as char,
                scale: self.name().to_string(),
            }
            .into()
        })
    }

    /// Scale values for every residue of `seq`
    pub fn values(&self, seq: &str) -> Result<Vec<f64>> {
        seq.bytes().map(|r| self.value(r)).collect()
    }

    pub fn min(&self) -> f64 {
        self.table()
            .values()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.table()
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl fmt::Display for FeatureScale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FeatureScale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        FeatureScale::ALL
            .iter()
            .find(|f| f.name() == s.trim())
            .copied()
            .ok_or_else(|| PipelineError::invalid(format!("unknown feature scale '{}'", s)).into())
    }
}

/// Parse a comma separated list of scale names, keeping the order
/// ```
/// use imrex_data::features::{parse_features, FeatureScale};
/// let f = parse_features("hydrophob,charge").unwrap();
/// assert_eq!(f, vec![FeatureScale::Hydrophobicity, FeatureScale::Charge]);
/// assert!(parse_features("hydrophob,color").is_err());
/// ```
pub fn parse_features(list: &str) -> Result<Vec<FeatureScale>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(FeatureScale::from_str)
        .collect()
}
