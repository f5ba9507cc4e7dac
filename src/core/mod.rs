//! Core data types for reference allele resolution.
//!
//! - [`Base`]: A single uppercase nucleotide (`A`, `C`, `G`, `T`)
//! - [`VariantRecord`]: One validated row of the input table
//! - [`ClassificationResult`]: A record with its alleles oriented as REF/ALT
//!
//! Positions are 1-based and closed: the first base of a chromosome is position 1.

pub mod types;
pub mod variant;

pub use types::Base;
pub use variant::{ClassificationResult, VariantRecord};
