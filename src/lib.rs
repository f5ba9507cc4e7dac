//! # allele-resolver
//!
//! A library for orienting fingerprint SNP alleles against a reference genome.
//!
//! Fingerprint SNP panels such as the GRAF list record two alleles per site
//! without saying which one is found in the reference genome. `allele-resolver`
//! looks up the reference base at each site in per-chromosome FASTA files and
//! reports the matching allele as REF and the other as ALT.
//!
//! ## Features
//!
//! - **Table validation**: Rejects malformed tables before any lookup is made
//! - **Indexed lookups**: Each chromosome file is opened once per run through
//!   its `.fai` index and only the queried base is read
//! - **Deterministic policy**: `ALLELE_1` wins ties; sites where neither allele
//!   matches are left out
//! - **Explicit failures**: A missing chromosome file aborts the run with the
//!   chromosome and the path that was tried
//! - **Preprocessing**: Normalizes GRAF `FP_SNPs.txt` and splits a genome FASTA
//!
//! ## Example
//!
//! ```rust,no_run
//! use allele_resolver::{ReferenceLayout, ResolutionEngine, SequenceStore};
//! use allele_resolver::parsing::tsv::parse_variant_table_text;
//!
//! let table = parse_variant_table_text(
//!     "#CHROM\tPOS\tRS_ID\tALLELE_1\tALLELE_2\nchr1\t100\trs123\tT\tA\n",
//! )
//! .unwrap();
//!
//! let mut store = SequenceStore::new(ReferenceLayout::new("refs/"));
//! let resolution = ResolutionEngine::new(&mut store)
//!     .resolve(&table.records)
//!     .unwrap();
//!
//! for result in &resolution.results {
//!     println!("{}: REF={} ALT={}", result.rs_id, result.reference, result.alternate);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Variant records, alleles and classification results
//! - [`reference`]: Per-chromosome reference layout and sequence store
//! - [`resolve`]: Allele classifier and resolution engine
//! - [`parsing`]: Fingerprint SNP, FASTA and variant table I/O
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod reference;
pub mod resolve;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::types::Base;
pub use core::variant::{ClassificationResult, VariantRecord};
pub use reference::layout::ReferenceLayout;
pub use reference::store::{SequenceSource, SequenceStore, StoreError};
pub use resolve::engine::{DropReason, Outcome, Resolution, ResolutionEngine, ResolveError};
