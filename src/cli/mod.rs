//! Command-line interface for allele-resolver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **preprocess**: Convert a GRAF fingerprint SNP list into a variant table
//! - **split**: Split a reference FASTA into one file per chromosome
//! - **validate**: Check a variant table against the table schema
//! - **resolve**: Orient each variant's alleles as REF/ALT against the reference
//!
//! ## Usage
//!
//! ```text
//! # Normalize the GRAF SNP list
//! allele-resolver preprocess FP_SNPs.txt
//!
//! # Split the reference genome
//! allele-resolver split GRCh38.d1.vd1.fa --output-dir refs/
//!
//! # Resolve REF/ALT alleles
//! allele-resolver resolve --reference-dir refs/ \
//!     --input FP_SNPs_10k_GB38_twoAllelsFormat.tsv --output Results.tsv
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::reference::layout::{ReferenceLayout, DEFAULT_PREFIX, DEFAULT_SUFFIX};

pub mod preprocess;
pub mod resolve;
pub mod split;
pub mod validate;

#[derive(Parser)]
#[command(name = "allele-resolver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Orient fingerprint SNP alleles as REF/ALT against a reference genome")]
#[command(
    long_about = "allele-resolver determines which of the two alleles of each fingerprint SNP is the reference allele.\n\nIt looks up the base at each SNP position in per-chromosome reference FASTA files and writes a table with:\n- The reference allele in the REF column\n- The other allele in the ALT column\n- SNPs whose alleles both differ from the reference left out"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the run summary
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a GRAF FP_SNPs.txt file into a variant table
    Preprocess(preprocess::PreprocessArgs),

    /// Split a reference FASTA into one file per chromosome
    Split(split::SplitArgs),

    /// Validate a variant table
    Validate(validate::ValidateArgs),

    /// Determine the REF/ALT alleles of each variant
    Resolve(resolve::ResolveArgs),
}

/// Naming of the per-chromosome reference files, shared by `split` and `resolve`
#[derive(clap::Args, Debug, Clone)]
pub struct LayoutArgs {
    /// File name prefix of the per-chromosome FASTA files
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// File name suffix of the per-chromosome FASTA files
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,
}

impl LayoutArgs {
    pub fn layout(&self, dir: impl Into<std::path::PathBuf>) -> ReferenceLayout {
        ReferenceLayout::new(dir)
            .with_prefix(&self.prefix)
            .with_suffix(&self.suffix)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Print a serializable summary as JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
