//! Binary operators combining the scale values of two residues
use crate::features::scale::FeatureScale;
use crate::shared::errors::PipelineError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Prod,
    Diff,
    AbsDiff,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Prod => "prod",
            Operator::Diff => "diff",
            Operator::AbsDiff => "absdiff",
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Operator::Prod => x * y,
            Operator::Diff => x - y,
            Operator::AbsDiff => (x - y).abs(),
        }
    }

    /// Smallest and largest values the operator can reach on `scale`
    pub fn bounds(&self, scale: &FeatureScale) -> (f64, f64) {
        let (lo, hi) = (scale.min(), scale.max());
        match self {
            Operator::Prod => {
                let corners = [lo * lo, lo * hi, hi * hi];
                (
                    corners.iter().copied().fold(f64::INFINITY, f64::min),
                    corners.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                )
            }
            Operator::Diff => (lo - hi, hi - lo),
            Operator::AbsDiff => (0., hi - lo),
        }
    }

    /// Rescale `value` into [0, 1] using the operator bounds on `scale`
    pub fn normalize(&self, value: f64, scale: &FeatureScale) -> f64 {
        let (lo, hi) = self.bounds(scale);
        if hi - lo == 0. {
            return 0.;
        }
        (value - lo) / (hi - lo)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "prod" => Ok(Operator::Prod),
            "diff" => Ok(Operator::Diff),
            "absdiff" => Ok(Operator::AbsDiff),
            _ => Err(PipelineError::invalid(format!("unknown operator '{}'", s)))?,
        }
    }
}

pub fn parse_operator(name: &str) -> Result<Operator> {
    Operator::from_str(name)
}
