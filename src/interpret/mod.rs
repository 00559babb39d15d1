//! Interpretation helpers: attributions, image conversions and structural
//! distance maps
pub mod attribution;
pub mod image;
pub mod structure;

pub use attribution::{integrated_gradients, RiemannMethod};
pub use image::AggregateMethod;
pub use structure::{pdb_to_fasta_mapper, residue_distance_min, ComplexRecord, MapperScoring};
