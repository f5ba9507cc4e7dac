use std::path::{Path, PathBuf};

/// File name prefix of the per-chromosome GDC GRCh38 reference files
pub const DEFAULT_PREFIX: &str = "GRCh38.d1.vd1_";

/// File name suffix of the per-chromosome reference files
pub const DEFAULT_SUFFIX: &str = ".fa";

/// Naming rule for per-chromosome reference files.
///
/// A chromosome `chr7` lives at `<dir>/<prefix>chr7<suffix>`. The splitter writes
/// files with this rule and the sequence store reads them back with it, so both
/// sides must be given the same layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLayout {
    pub dir: PathBuf,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ReferenceLayout {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl ReferenceLayout {
    /// Layout rooted at `dir` with the default prefix and suffix
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn file_name(&self, chromosome: &str) -> String {
        format!("{}{}{}", self.prefix, chromosome, self.suffix)
    }

    #[must_use]
    pub fn path_for(&self, chromosome: &str) -> PathBuf {
        self.dir.join(self.file_name(chromosome))
    }
}
