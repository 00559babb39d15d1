//! Feature images from physico-chemical scales
pub mod builder;
pub mod operator;
pub mod scale;

pub use builder::FeatureBuilder;
pub use operator::{parse_operator, Operator};
pub use scale::{parse_features, FeatureScale};
