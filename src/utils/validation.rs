//! Centralized validation and helper functions.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Maximum number of records allowed in a single variant table (DOS protection)
pub const MAX_RECORDS: usize = 10_000_000;

/// Maximum length of a chromosome identifier
pub const MAX_CHROMOSOME_NAME_LENGTH: usize = 255;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Validate a chromosome identifier.
///
/// Chromosome identifiers become part of a file name, so they must not contain
/// whitespace, path separators, control characters, or be a relative path component.
///
/// # Examples
///
/// ```
/// use allele_resolver::utils::validation::is_valid_chromosome_name;
///
/// assert!(is_valid_chromosome_name("chr7"));
/// assert!(is_valid_chromosome_name("chrUn_KI270302v1"));
/// assert!(!is_valid_chromosome_name("chr 7"));
/// assert!(!is_valid_chromosome_name("../chr7"));
/// ```
#[must_use]
pub fn is_valid_chromosome_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_CHROMOSOME_NAME_LENGTH
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '/' || c == '\\')
}

/// Write `contents` to `path` so that the file either appears complete or not at all.
///
/// The data is written to a temporary file in the destination directory and then
/// renamed over `path`.
///
/// # Errors
///
/// Returns an I/O error if the temporary file cannot be created, written, or renamed.
pub fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
