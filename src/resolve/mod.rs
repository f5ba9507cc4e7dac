//! Reference allele resolution.
//!
//! For each variant record both alleles are compared against the reference base
//! at the record's position:
//!
//! | allele_1 matches | allele_2 matches | Output            |
//! |------------------|------------------|-------------------|
//! | yes              | any              | REF=allele_1      |
//! | no               | yes              | REF=allele_2      |
//! | no               | no               | record is dropped |
//!
//! A position past the end of its chromosome matches neither allele, so the
//! record is dropped with a warning. Output rows keep the order of the input table.

pub mod classifier;
pub mod engine;

pub use classifier::{classify_allele, is_reference, AlleleMatch};
pub use engine::{
    classify_record, DropReason, Outcome, Resolution, ResolutionEngine, ResolutionObserver,
    ResolutionSummary, ResolveError, TracingObserver,
};
