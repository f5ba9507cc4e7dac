//! Parser for GRAF fingerprint SNP lists (`FP_SNPs.txt`).
//!
//! The GRAF 2.4 package ships its fingerprint SNPs as a whitespace-separated
//! text file with one header line and the columns:
//!
//! | Column | Content                  |
//! |--------|--------------------------|
//! | 1      | dbSNP rs number (digits) |
//! | 2      | chromosome number        |
//! | 3      | GRCh37 position          |
//! | 4      | GRCh38 position          |
//! | 5      | allele 1                 |
//! | 6      | allele 2                 |
//!
//! The normalized table keeps the GRCh38 coordinates and prefixes chromosomes
//! with `chr` and identifiers with `rs`. Chromosome 23 rows are excluded.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::parsing::fasta::open_text;
use crate::parsing::tsv::INPUT_COLUMNS;
use crate::utils::validation::write_atomically;

/// File name of the normalized table when no output path is given
pub const DEFAULT_OUTPUT_NAME: &str = "FP_SNPs_10k_GB38_twoAllelsFormat.tsv";

/// Chromosome excluded from the normalized table
pub const EXCLUDED_CHROMOSOME: &str = "chr23";

const MIN_FIELDS: usize = 6;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is empty: no header line found")]
    Empty,
}

/// Line counts for a preprocessing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreprocessSummary {
    pub written: usize,
    pub skipped_short: usize,
    pub skipped_excluded: usize,
}

/// Default output location: [`DEFAULT_OUTPUT_NAME`] next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_NAME)
}

/// Convert the fingerprint SNP list at `input` into a normalized table at `output`.
///
/// # Errors
///
/// Returns `PreprocessError::Io` if either file cannot be accessed, or
/// `PreprocessError::Empty` if the input has no header line.
pub fn preprocess_file(input: &Path, output: &Path) -> Result<PreprocessSummary, PreprocessError> {
    info!("Preprocessing {} into {}", input.display(), output.display());
    let mut buffer = Vec::new();
    let summary = preprocess_reader(open_text(input)?, &mut buffer)?;
    write_atomically(output, &buffer)?;
    Ok(summary)
}

/// Convert fingerprint SNP text into a normalized tab-separated table.
///
/// Lines with fewer than six columns are skipped with a warning naming the line.
///
/// # Errors
///
/// Returns `PreprocessError::Empty` if the input has no header line, or an I/O
/// error from reading or writing.
pub fn preprocess_reader<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
) -> Result<PreprocessSummary, PreprocessError> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            header?;
        }
        None => return Err(PreprocessError::Empty),
    }

    writeln!(writer, "{}", INPUT_COLUMNS.join("\t"))?;

    let mut summary = PreprocessSummary::default();

    for (i, line) in lines.enumerate() {
        let line = line?;
        // Header is line 1
        let line_num = i + 2;

        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            warn!(
                "Line {} has {} columns, expected at least {}; skipping",
                line_num,
                fields.len(),
                MIN_FIELDS
            );
            summary.skipped_short += 1;
            continue;
        }

        let chromosome = format!("chr{}", fields[1]);
        if chromosome == EXCLUDED_CHROMOSOME {
            summary.skipped_excluded += 1;
            continue;
        }

        writeln!(
            writer,
            "{}\t{}\trs{}\t{}\t{}",
            chromosome, fields[3], fields[0], fields[4], fields[5]
        )?;
        summary.written += 1;
    }

    info!(
        "Wrote {} SNPs ({} short lines, {} {} rows skipped)",
        summary.written, summary.skipped_short, summary.skipped_excluded, EXCLUDED_CHROMOSOME
    );
    Ok(summary)
}
