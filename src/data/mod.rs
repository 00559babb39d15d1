//! Sequence sources, reference pools and streams
pub mod control;
pub mod known_pairs;
pub mod negatives;
pub mod source;
pub mod stream;

pub use control::ControlCdr3Source;
pub use known_pairs::KnownPairs;
pub use source::{NegativeOrigin, SequenceSource, SourceHeaders};
pub use stream::DataStream;
