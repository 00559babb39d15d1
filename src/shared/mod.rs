//! Types and helpers shared by the data pipeline and the interpretation tools
pub mod amino_acids;
pub mod errors;
pub mod logging;
pub mod parameters;
pub mod parser;
pub mod sequence;
pub mod utils;

pub use errors::PipelineError;
pub use logging::LoggingConfig;
pub use parameters::GeneratorParameters;
pub use sequence::{Label, SequencePair};
