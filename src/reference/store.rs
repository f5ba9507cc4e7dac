use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::core::{Position, Region};
use noodles::fasta;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parsing::fasta::is_gzipped;
use crate::reference::layout::ReferenceLayout;
use crate::utils::validation::is_valid_chromosome_name;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Reference file for {chromosome} not found: {}", path.display())]
    ResourceNotFound { chromosome: String, path: PathBuf },

    #[error("Invalid chromosome name: '{0}'")]
    InvalidChromosome(String),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse FASTA {}: {message}", path.display())]
    Fasta { path: PathBuf, message: String },

    #[error("Sequence {chromosome} not found in {}", path.display())]
    ContigNotFound { chromosome: String, path: PathBuf },

    #[error("Position 0 is not a valid 1-based coordinate on {0}")]
    InvalidPosition(String),
}

/// Single-base lookup by chromosome and 1-based position.
pub trait SequenceSource {
    /// Return the reference base at `position` (1-based) on `chromosome`, or
    /// `None` if the position lies past the end of the chromosome.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the chromosome cannot be located or read, or
    /// if `position` is 0.
    fn base_at(&mut self, chromosome: &str, position: u64) -> Result<Option<u8>, StoreError>;
}

type FastaReader = fasta::io::IndexedReader<BufReader<File>>;

/// An uncompressed chromosome file opened through its `.fai` index
struct IndexedChromosome {
    path: PathBuf,
    length: u64,
    reader: FastaReader,
}

impl IndexedChromosome {
    fn open(path: &Path, chromosome: &str) -> Result<Self, StoreError> {
        let index = read_or_build_index(path)?;

        let length = index
            .as_ref()
            .iter()
            .find(|record| String::from_utf8_lossy(record.name()) == chromosome)
            .map(|record| record.length())
            .ok_or_else(|| StoreError::ContigNotFound {
                chromosome: chromosome.to_string(),
                path: path.to_path_buf(),
            })?;

        let file = File::open(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = fasta::io::indexed_reader::Builder::default()
            .set_index(index)
            .build_from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Opened {} ({} bases) from {}", chromosome, length, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            length,
            reader,
        })
    }

    fn base_at(&mut self, chromosome: &str, position: u64) -> Result<Option<u8>, StoreError> {
        if position > self.length {
            return Ok(None);
        }
        let Some(start) = usize::try_from(position).ok().and_then(Position::new) else {
            return Ok(None);
        };

        let region = Region::new(chromosome, start..=start);
        let record = self.reader.query(&region).map_err(|e| StoreError::Fasta {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Ok(record.sequence().as_ref().first().copied())
    }
}

impl std::fmt::Debug for IndexedChromosome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedChromosome")
            .field("path", &self.path)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Per-chromosome reference sequences read from disk.
///
/// Uncompressed files are read one base at a time through a `.fai` index; the
/// index is built and written next to the file when missing, and the open reader
/// is kept for the lifetime of the store. Gzip files cannot be indexed, so the
/// sequence is decoded into memory and held only while consecutive lookups stay
/// on the same chromosome.
#[derive(Debug)]
pub struct SequenceStore {
    layout: ReferenceLayout,
    indexed: HashMap<String, IndexedChromosome>,
    loaded: Option<(String, Vec<u8>)>,
}

impl SequenceStore {
    pub fn new(layout: ReferenceLayout) -> Self {
        Self {
            layout,
            indexed: HashMap::new(),
            loaded: None,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &ReferenceLayout {
        &self.layout
    }

    /// Number of chromosomes with an open indexed reader
    #[must_use]
    pub fn indexed_chromosomes(&self) -> usize {
        self.indexed.len()
    }

    /// Chromosome whose decoded sequence is currently held in memory
    #[must_use]
    pub fn loaded_chromosome(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(name, _)| name.as_str())
    }

    /// Check every listed chromosome before any lookup.
    ///
    /// Uncompressed files are opened and indexed; gzip files are only checked for
    /// existence. A table referencing an absent chromosome is therefore rejected
    /// before any record is classified.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the first chromosome that cannot be opened.
    pub fn preload<'a, I>(&mut self, chromosomes: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for chromosome in chromosomes {
            if self.indexed.contains_key(chromosome) {
                continue;
            }
            let path = self.resource_path(chromosome)?;
            if !is_gzipped(&path) {
                let handle = IndexedChromosome::open(&path, chromosome)?;
                self.indexed.insert(chromosome.to_string(), handle);
            }
        }
        Ok(())
    }

    fn resource_path(&self, chromosome: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_chromosome_name(chromosome) {
            return Err(StoreError::InvalidChromosome(chromosome.to_string()));
        }

        let path = self.layout.path_for(chromosome);
        if !path.is_file() {
            return Err(StoreError::ResourceNotFound {
                chromosome: chromosome.to_string(),
                path,
            });
        }
        Ok(path)
    }
}

impl SequenceSource for SequenceStore {
    fn base_at(&mut self, chromosome: &str, position: u64) -> Result<Option<u8>, StoreError> {
        if position == 0 {
            return Err(StoreError::InvalidPosition(chromosome.to_string()));
        }

        if let Some((name, _)) = &self.loaded {
            if name != chromosome {
                debug!("Releasing {}", name);
                self.loaded = None;
            }
        }

        if let Some(handle) = self.indexed.get_mut(chromosome) {
            return handle.base_at(chromosome, position);
        }
        if let Some((_, sequence)) = &self.loaded {
            return Ok(base_in(sequence, position));
        }

        let path = self.resource_path(chromosome)?;
        if is_gzipped(&path) {
            let sequence = load_sequence(&path, chromosome)?;
            let base = base_in(&sequence, position);
            self.loaded = Some((chromosome.to_string(), sequence));
            Ok(base)
        } else {
            let mut handle = IndexedChromosome::open(&path, chromosome)?;
            let base = handle.base_at(chromosome, position)?;
            self.indexed.insert(chromosome.to_string(), handle);
            Ok(base)
        }
    }
}

/// Index a loaded sequence with a 1-based position; 0 and past-the-end give `None`
pub(crate) fn base_in(sequence: &[u8], position: u64) -> Option<u8> {
    let index = usize::try_from(position.checked_sub(1)?).ok()?;
    sequence.get(index).copied()
}

fn fai_path(path: &Path) -> PathBuf {
    let mut fai = path.as_os_str().to_owned();
    fai.push(".fai");
    PathBuf::from(fai)
}

/// Read `<path>.fai`, or index the FASTA and try to save the index beside it
fn read_or_build_index(path: &Path) -> Result<fasta::fai::Index, StoreError> {
    let fai = fai_path(path);
    let parse_error = |e: std::io::Error| StoreError::Fasta {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if fai.is_file() {
        let reader = File::open(&fai).map(BufReader::new).map_err(|source| StoreError::Io {
            path: fai.clone(),
            source,
        })?;
        return fasta::fai::io::Reader::new(reader)
            .read_index()
            .map_err(parse_error);
    }

    debug!("Indexing {}", path.display());
    let index = fasta::io::index(path).map_err(parse_error)?;

    let written = File::create(&fai)
        .and_then(|file| fasta::fai::io::Writer::new(file).write_index(&index));
    if let Err(e) = written {
        warn!("Could not write index {}: {}", fai.display(), e);
    }

    Ok(index)
}

fn load_sequence(path: &Path, chromosome: &str) -> Result<Vec<u8>, StoreError> {
    debug!("Loading {} from {}", chromosome, path.display());

    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = fasta::io::Reader::new(BufReader::new(MultiGzDecoder::new(file)));
    let sequence = read_contig(&mut reader, chromosome, path)?;

    debug!("Loaded {} ({} bases)", chromosome, sequence.len());
    Ok(sequence)
}

/// Find the record named `chromosome` and return its bases
fn read_contig<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
    chromosome: &str,
    path: &Path,
) -> Result<Vec<u8>, StoreError> {
    for result in reader.records() {
        let record = result.map_err(|e| StoreError::Fasta {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if String::from_utf8_lossy(record.name()) == chromosome {
            return Ok(record.sequence().as_ref().to_vec());
        }
    }

    Err(StoreError::ContigNotFound {
        chromosome: chromosome.to_string(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn write_reference(dir: &Path, file_name: &str, content: &[u8]) {
        std::fs::write(dir.join(file_name), content).unwrap();
    }

    fn write_gzipped_reference(dir: &Path, file_name: &str, content: &[u8]) {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        write_reference(dir, file_name, &encoder.finish().unwrap());
    }

    #[test]
    fn test_base_at_is_one_based() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACGT\nTTGA\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr1", 1).unwrap(), Some(b'A'));
        assert_eq!(store.base_at("chr1", 4).unwrap(), Some(b'T'));
        // Line breaks are not part of the sequence
        assert_eq!(store.base_at("chr1", 5).unwrap(), Some(b'T'));
        assert_eq!(store.base_at("chr1", 8).unwrap(), Some(b'A'));
    }

    #[test]
    fn test_indexed_lookup_across_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(
            dir.path(),
            "GRCh38.d1.vd1_chr3.fa",
            b">chr3 AC:CM000665.2\nAAAACCCC\nGGGGTTTT\nACGTA\n",
        );

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        let expected = b"AAAACCCCGGGGTTTTACGTA";
        for (i, base) in expected.iter().enumerate().rev() {
            assert_eq!(
                store.base_at("chr3", i as u64 + 1).unwrap(),
                Some(*base),
                "position {}",
                i + 1
            );
        }

        assert_eq!(store.indexed_chromosomes(), 1);
        assert!(store.loaded_chromosome().is_none());
        // The index is saved for later runs
        assert!(dir.path().join("GRCh38.d1.vd1_chr3.fa.fai").is_file());
    }

    #[test]
    fn test_existing_index_is_used() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACGT\nTTGA\n");
        // name, length, offset, line bases, line width
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa.fai", b"chr1\t8\t6\t4\t5\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr1", 6).unwrap(), Some(b'T'));
        assert_eq!(store.base_at("chr1", 9).unwrap(), None);
    }

    #[test]
    fn test_missing_resource_names_chromosome_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));

        match store.base_at("chr9", 10) {
            Err(StoreError::ResourceNotFound { chromosome, path }) => {
                assert_eq!(chromosome, "chr9");
                assert_eq!(path, dir.path().join("GRCh38.d1.vd1_chr9.fa"));
            }
            other => panic!("Expected ResourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_position_past_end_has_no_base() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACGT\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr1", 5).unwrap(), None);
        assert_eq!(store.base_at("chr1", 1_000_000).unwrap(), None);
        assert!(matches!(
            store.base_at("chr1", 0),
            Err(StoreError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_record_name_must_match() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr2.fa", b">chr3\nACGT\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert!(matches!(
            store.base_at("chr2", 1),
            Err(StoreError::ContigNotFound { .. })
        ));
    }

    #[test]
    fn test_header_description_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(
            dir.path(),
            "GRCh38.d1.vd1_chr2.fa",
            b">chr2  AC:CM000664.2  gi:568336022  LN:242193529\nNNNNG\n",
        );

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr2", 5).unwrap(), Some(b'G'));
    }

    #[test]
    fn test_readers_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACGT\n");
        write_reference(dir.path(), "GRCh38.d1.vd1_chr2.fa", b">chr2\nTTTT\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr1", 2).unwrap(), Some(b'C'));
        assert_eq!(store.base_at("chr2", 2).unwrap(), Some(b'T'));
        assert_eq!(store.base_at("chr1", 3).unwrap(), Some(b'G'));
        assert_eq!(store.indexed_chromosomes(), 2);
    }

    #[test]
    fn test_preload_fails_on_missing_chromosome() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACGT\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        let result = store.preload(["chr1", "chr2"]);
        assert!(matches!(
            result,
            Err(StoreError::ResourceNotFound { ref chromosome, .. }) if chromosome == "chr2"
        ));
    }

    #[test]
    fn test_gzipped_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_gzipped_reference(dir.path(), "ref_chrM.fa.gz", b">chrM\nGATCACAGG\n");

        let layout = ReferenceLayout::new(dir.path())
            .with_prefix("ref_")
            .with_suffix(".fa.gz");
        let mut store = SequenceStore::new(layout);
        assert_eq!(store.base_at("chrM", 4).unwrap(), Some(b'C'));
        assert_eq!(store.base_at("chrM", 10).unwrap(), None);
        assert_eq!(store.loaded_chromosome(), Some("chrM"));
        assert_eq!(store.indexed_chromosomes(), 0);
    }

    #[test]
    fn test_gzipped_sequence_released_on_chromosome_change() {
        let dir = tempfile::tempdir().unwrap();
        write_gzipped_reference(dir.path(), "ref_chr1.fa.gz", b">chr1\nACGT\n");
        write_gzipped_reference(dir.path(), "ref_chr2.fa.gz", b">chr2\nGGCC\n");

        let layout = ReferenceLayout::new(dir.path())
            .with_prefix("ref_")
            .with_suffix(".fa.gz");
        let mut store = SequenceStore::new(layout);

        assert_eq!(store.base_at("chr1", 1).unwrap(), Some(b'A'));
        assert_eq!(store.loaded_chromosome(), Some("chr1"));
        assert_eq!(store.base_at("chr2", 4).unwrap(), Some(b'C'));
        assert_eq!(store.loaded_chromosome(), Some("chr2"));
        assert_eq!(store.base_at("chr1", 4).unwrap(), Some(b'T'));
        assert_eq!(store.loaded_chromosome(), Some("chr1"));
    }

    #[test]
    fn test_rejects_path_like_chromosome() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert!(matches!(
            store.base_at("../chr1", 1),
            Err(StoreError::InvalidChromosome(_))
        ));
    }

    #[test]
    fn test_lowercase_bases_are_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path(), "GRCh38.d1.vd1_chr1.fa", b">chr1\nACgt\n");

        let mut store = SequenceStore::new(ReferenceLayout::new(dir.path()));
        assert_eq!(store.base_at("chr1", 3).unwrap(), Some(b'g'));
    }

    #[test]
    fn test_base_in() {
        assert_eq!(base_in(b"ACGT", 1), Some(b'A'));
        assert_eq!(base_in(b"ACGT", 4), Some(b'T'));
        assert_eq!(base_in(b"ACGT", 5), None);
        assert_eq!(base_in(b"ACGT", 0), None);
    }
}
