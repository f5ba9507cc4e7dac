use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::types::Base;
use crate::core::variant::{ClassificationResult, VariantRecord};
use crate::utils::validation::{check_record_limit, is_valid_chromosome_name, write_atomically};

/// Columns of a normalized variant table, in order
pub const INPUT_COLUMNS: [&str; 5] = ["#CHROM", "POS", "RS_ID", "ALLELE_1", "ALLELE_2"];

/// Columns of a resolved variant table, in order
pub const OUTPUT_COLUMNS: [&str; 5] = ["#CHROM", "POS", "RS_ID", "REF", "ALT"];

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table is empty: no header line found")]
    EmptyTable,

    #[error("Missing columns in the TSV file, expected: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Columns are not in the expected order: expected {}, found {}", INPUT_COLUMNS.join(", "), .0.join(", "))]
    ColumnOrder(Vec<String>),

    #[error("Missing value in column '{column}' on line {line}")]
    MissingValue { line: usize, column: &'static str },

    #[error("Line {line} has {found} fields, expected {}", INPUT_COLUMNS.len())]
    TooManyFields { line: usize, found: usize },

    #[error("Invalid chromosome on line {line}: '{value}'")]
    InvalidChromosome { line: usize, value: String },

    #[error("POS must be a positive integer on line {line}: '{value}'")]
    InvalidPosition { line: usize, value: String },

    #[error("Invalid allele in column '{column}' on line {line}: '{value}' (expected one of A, T, C, G)")]
    InvalidAllele {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Duplicate RS_ID '{rs_id}' on line {line} (first seen on line {first_line})")]
    DuplicateRsId {
        rs_id: String,
        first_line: usize,
        line: usize,
    },

    #[error("{0}")]
    TooManyRecords(String),
}

/// A validated variant table.
///
/// Every record satisfies the table schema: all fields present, positive
/// positions, alleles in `{A, C, G, T}` and unique `RS_ID` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantTable {
    pub records: Vec<VariantRecord>,
}

impl VariantTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct chromosomes in order of first appearance
    #[must_use]
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|r| r.chromosome.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Read and validate a variant table file.
///
/// # Errors
///
/// Returns `ValidationError::Io` if the file cannot be read, or the first schema
/// violation found in the content.
pub fn parse_variant_table_file(path: &Path) -> Result<VariantTable, ValidationError> {
    info!("Validating variant table {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_variant_table_text(&content)
}

/// Validate variant table text.
///
/// The first line must be the header `#CHROM POS RS_ID ALLELE_1 ALLELE_2`
/// (tab-separated, in that order). Blank lines are ignored.
///
/// # Errors
///
/// Returns the first schema violation; no partially validated table is produced.
pub fn parse_variant_table_text(text: &str) -> Result<VariantTable, ValidationError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(ValidationError::EmptyTable)?;
    check_header(header)?;
    debug!("Header is valid");

    let mut records = Vec::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (line_num, line) in lines {
        if let Some(message) = check_record_limit(records.len()) {
            return Err(ValidationError::TooManyRecords(message));
        }

        let record = parse_record(line, line_num)?;

        if let Some(&first_line) = first_seen.get(&record.rs_id) {
            return Err(ValidationError::DuplicateRsId {
                rs_id: record.rs_id,
                first_line,
                line: line_num,
            });
        }
        first_seen.insert(record.rs_id.clone(), line_num);

        records.push(record);
    }

    info!("Variant table is valid ({} records)", records.len());
    Ok(VariantTable { records })
}

fn check_header(header: &str) -> Result<(), ValidationError> {
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

    let missing: Vec<String> = INPUT_COLUMNS
        .iter()
        .filter(|expected| !columns.contains(expected))
        .map(|s| (*s).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns(missing));
    }

    if columns != INPUT_COLUMNS {
        return Err(ValidationError::ColumnOrder(
            columns.into_iter().map(str::to_string).collect(),
        ));
    }

    Ok(())
}

fn parse_record(line: &str, line_num: usize) -> Result<VariantRecord, ValidationError> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

    if fields.len() > INPUT_COLUMNS.len() {
        return Err(ValidationError::TooManyFields {
            line: line_num,
            found: fields.len(),
        });
    }

    let chromosome = field(&fields, 0, line_num)?;
    let position = field(&fields, 1, line_num)?;
    let rs_id = field(&fields, 2, line_num)?;
    let allele_1 = field(&fields, 3, line_num)?;
    let allele_2 = field(&fields, 4, line_num)?;

    if !is_valid_chromosome_name(chromosome) {
        return Err(ValidationError::InvalidChromosome {
            line: line_num,
            value: chromosome.to_string(),
        });
    }

    let position = match position.parse::<u64>() {
        Ok(p) if p > 0 => p,
        _ => {
            return Err(ValidationError::InvalidPosition {
                line: line_num,
                value: position.to_string(),
            })
        }
    };

    let parse_allele = |value: &str, column: &'static str| {
        Base::parse(value).ok_or_else(|| ValidationError::InvalidAllele {
            line: line_num,
            column,
            value: value.to_string(),
        })
    };
    let allele_1 = parse_allele(allele_1, INPUT_COLUMNS[3])?;
    let allele_2 = parse_allele(allele_2, INPUT_COLUMNS[4])?;

    Ok(VariantRecord::new(
        chromosome, position, rs_id, allele_1, allele_2,
    ))
}

/// Non-empty value of column `index`; short rows count as having empty trailing values
fn field<'a>(fields: &[&'a str], index: usize, line_num: usize) -> Result<&'a str, ValidationError> {
    match fields.get(index) {
        Some(value) if !value.is_empty() => Ok(*value),
        _ => Err(ValidationError::MissingValue {
            line: line_num,
            column: INPUT_COLUMNS[index],
        }),
    }
}

/// Write resolved records as a tab-separated table, header first.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &[ClassificationResult],
) -> std::io::Result<()> {
    writeln!(writer, "{}", OUTPUT_COLUMNS.join("\t"))?;
    for result in results {
        writeln!(writer, "{}", result.to_tsv_row())?;
    }
    Ok(())
}

/// Write resolved records to `path`.
///
/// The whole table is buffered and moved into place in one step, so `path` never
/// holds a truncated table.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_results_file(path: &Path, results: &[ClassificationResult]) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    write_results(&mut buffer, results)?;
    write_atomically(path, &buffer)?;
    info!("Wrote {} records to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#CHROM\tPOS\tRS_ID\tALLELE_1\tALLELE_2\n";

    fn table(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    #[test]
    fn test_parse_valid_table() {
        let text = table("chr1\t100\trs123\tA\tT\nchr2\t2000\trs124\tG\tC\n");
        let parsed = parse_variant_table_text(&text).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed.records[0],
            VariantRecord::new("chr1", 100, "rs123", Base::A, Base::T)
        );
        assert_eq!(parsed.records[1].position, 2000);
        assert_eq!(parsed.chromosomes(), vec!["chr1", "chr2"]);
    }

    #[test]
    fn test_header_only_is_valid() {
        let parsed = parse_variant_table_text(HEADER).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = "#CHROM\tPOS\tRS_ID\tALLELE_1\tALLELE_2\r\nchr1\t5\trs1\tA\tC\r\n\r\n";
        let parsed = parse_variant_table_text(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.records[0].allele_2, Base::C);
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(
            parse_variant_table_text(""),
            Err(ValidationError::EmptyTable)
        ));
    }

    #[test]
    fn test_missing_columns() {
        let text = "#CHROM\tPOS\tRS_ID\tALLELE1\tALLELE2\nchr1\t1\trs1\tA\tC\n";
        match parse_variant_table_text(text) {
            Err(ValidationError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["ALLELE_1", "ALLELE_2"]);
            }
            other => panic!("Expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_column_order() {
        let text = "POS\t#CHROM\tRS_ID\tALLELE_1\tALLELE_2\n1\tchr1\trs1\tA\tC\n";
        assert!(matches!(
            parse_variant_table_text(text),
            Err(ValidationError::ColumnOrder(_))
        ));
    }

    #[test]
    fn test_extra_column_is_rejected() {
        let text = "#CHROM\tPOS\tRS_ID\tALLELE_1\tALLELE_2\tQUAL\n";
        assert!(matches!(
            parse_variant_table_text(text),
            Err(ValidationError::ColumnOrder(_))
        ));
    }

    #[test]
    fn test_missing_value() {
        let text = table("chr1\t100\t\tA\tT\n");
        match parse_variant_table_text(&text) {
            Err(ValidationError::MissingValue { line, column }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "RS_ID");
            }
            other => panic!("Expected MissingValue, got {other:?}"),
        }

        let text = table("chr1\t100\trs1\tA\n");
        assert!(matches!(
            parse_variant_table_text(&text),
            Err(ValidationError::MissingValue {
                column: "ALLELE_2",
                ..
            })
        ));
    }

    #[test]
    fn test_too_many_fields() {
        let text = table("chr1\t100\trs1\tA\tT\textra\n");
        assert!(matches!(
            parse_variant_table_text(&text),
            Err(ValidationError::TooManyFields { line: 2, found: 6 })
        ));
    }

    #[test]
    fn test_invalid_position() {
        for pos in ["abc", "0", "-5", "1.5"] {
            let text = table(&format!("chr1\t{pos}\trs1\tA\tT\n"));
            assert!(
                matches!(
                    parse_variant_table_text(&text),
                    Err(ValidationError::InvalidPosition { .. })
                ),
                "POS {pos:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_alleles() {
        for (a1, a2, column) in [
            ("N", "A", "ALLELE_1"),
            ("A", "a", "ALLELE_2"),
            ("AT", "G", "ALLELE_1"),
            ("C", "-", "ALLELE_2"),
        ] {
            let text = table(&format!("chr1\t10\trs1\t{a1}\t{a2}\n"));
            match parse_variant_table_text(&text) {
                Err(ValidationError::InvalidAllele { column: c, .. }) => assert_eq!(c, column),
                other => panic!("Expected InvalidAllele for {a1}/{a2}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_chromosome() {
        let text = table("chr 1\t10\trs1\tA\tC\n");
        assert!(matches!(
            parse_variant_table_text(&text),
            Err(ValidationError::InvalidChromosome { .. })
        ));
    }

    #[test]
    fn test_duplicate_rs_id() {
        let text = table("chr1\t10\trs1\tA\tC\nchr1\t20\trs2\tA\tC\nchr2\t30\trs1\tG\tT\n");
        match parse_variant_table_text(&text) {
            Err(ValidationError::DuplicateRsId {
                rs_id,
                first_line,
                line,
            }) => {
                assert_eq!(rs_id, "rs1");
                assert_eq!(first_line, 2);
                assert_eq!(line, 4);
            }
            other => panic!("Expected DuplicateRsId, got {other:?}"),
        }
    }

    #[test]
    fn test_write_results() {
        let records = [
            VariantRecord::new("chr1", 100, "rs123", Base::A, Base::T),
            VariantRecord::new("chr1", 100, "rs124", Base::T, Base::A),
        ];
        let results = vec![
            ClassificationResult::new(&records[0], Base::A, Base::T),
            ClassificationResult::new(&records[1], Base::A, Base::T),
        ];

        let mut out = Vec::new();
        write_results(&mut out, &results).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#CHROM\tPOS\tRS_ID\tREF\tALT\nchr1\t100\trs123\tA\tT\nchr1\t100\trs124\tA\tT\n"
        );
    }

    #[test]
    fn test_write_results_empty_keeps_header() {
        let mut out = Vec::new();
        write_results(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "#CHROM\tPOS\tRS_ID\tREF\tALT\n");
    }
}
