//! Splitting a multi-chromosome reference FASTA into one file per chromosome.
//!
//! Supports both uncompressed and gzip/bgzip compressed input.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::reference::layout::ReferenceLayout;
use crate::utils::validation::is_valid_chromosome_name;

/// Only records whose name starts with this prefix are written out
pub const CHROMOSOME_PREFIX: &str = "chr";

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chromosome {0} appears more than once in the reference")]
    DuplicateChromosome(String),

    #[error("No chromosome records (headers starting with '>{CHROMOSOME_PREFIX}') found")]
    NoChromosomes,
}

/// What a split run wrote and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    /// Chromosomes written, in file order
    pub chromosomes: Vec<String>,
    /// Records skipped because they are not chromosomes (decoys, HLA, viral)
    pub skipped: Vec<String>,
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a text file, transparently decompressing gzip/bgzip input
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened.
pub fn open_text(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Split the reference FASTA at `path` into per-chromosome files laid out by `layout`.
///
/// # Errors
///
/// Returns `SplitError::Io` if the input cannot be read or an output cannot be
/// created, and the other `SplitError` variants as described on [`split_reader`].
pub fn split_reference(path: &Path, layout: &ReferenceLayout) -> Result<SplitSummary, SplitError> {
    if !is_fasta_file(path) {
        warn!(
            "{} does not have a FASTA extension, splitting anyway",
            path.display()
        );
    }
    info!("Splitting {} into {}", path.display(), layout.dir().display());
    split_reader(open_text(path)?, layout)
}

/// An output file being written, moved into place once complete
struct PendingChromosome {
    name: String,
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl PendingChromosome {
    fn create(name: &str, layout: &ReferenceLayout) -> Result<Self, SplitError> {
        let temp = NamedTempFile::new_in(layout.dir())?;
        Ok(Self {
            name: name.to_string(),
            target: layout.path_for(name),
            writer: BufWriter::new(temp),
        })
    }

    fn finish(self) -> Result<String, SplitError> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.target)
            .map_err(|e| SplitError::Persist {
                path: self.target.clone(),
                source: e.error,
            })?;
        debug!("Wrote {} to {}", self.name, self.target.display());
        Ok(self.name)
    }
}

/// Split FASTA text into per-chromosome files.
///
/// Each record whose name starts with `chr` gets its own file; the header line and
/// sequence lines are copied as-is with surrounding whitespace removed. Records
/// with other names are skipped along with their sequence. Each file is written to
/// a temporary name and renamed into place when its record ends.
///
/// # Errors
///
/// Returns `SplitError::DuplicateChromosome` if a chromosome appears twice and
/// `SplitError::NoChromosomes` if the input contains no chromosome record.
pub fn split_reader<R: BufRead>(
    reader: R,
    layout: &ReferenceLayout,
) -> Result<SplitSummary, SplitError> {
    std::fs::create_dir_all(layout.dir())?;

    let mut summary = SplitSummary::default();
    let mut seen = HashSet::new();
    let mut current: Option<PendingChromosome> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(definition) = line.strip_prefix('>') {
            if let Some(pending) = current.take() {
                summary.chromosomes.push(pending.finish()?);
            }

            let name = definition.split_whitespace().next().unwrap_or_default();
            if !name.starts_with(CHROMOSOME_PREFIX) || !is_valid_chromosome_name(name) {
                debug!("Skipping non-chromosome record '{}'", name);
                summary.skipped.push(name.to_string());
                continue;
            }
            if !seen.insert(name.to_string()) {
                return Err(SplitError::DuplicateChromosome(name.to_string()));
            }

            let mut pending = PendingChromosome::create(name, layout)?;
            writeln!(pending.writer, "{line}")?;
            current = Some(pending);
        } else if let Some(pending) = current.as_mut() {
            writeln!(pending.writer, "{line}")?;
        }
    }

    if let Some(pending) = current.take() {
        summary.chromosomes.push(pending.finish()?);
    }

    if summary.chromosomes.is_empty() {
        return Err(SplitError::NoChromosomes);
    }

    info!(
        "Wrote {} chromosome files ({} records skipped)",
        summary.chromosomes.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
