//! Access to per-chromosome reference sequences.
//!
//! - [`layout`]: The naming rule mapping a chromosome to its FASTA file
//! - [`store`]: Indexed, 1-based single-base lookup into those files

pub mod layout;
pub mod store;

pub use layout::ReferenceLayout;
pub use store::{SequenceSource, SequenceStore, StoreError};
