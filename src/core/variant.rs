use serde::Serialize;

use crate::core::types::Base;

/// One row of a validated variant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    /// Chromosome identifier as written in the `#CHROM` column (e.g. `chr7`)
    pub chromosome: String,

    /// 1-based position on the chromosome
    pub position: u64,

    /// dbSNP identifier, unique within a table
    pub rs_id: String,

    pub allele_1: Base,
    pub allele_2: Base,
}

impl VariantRecord {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        rs_id: impl Into<String>,
        allele_1: Base,
        allele_2: Base,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            rs_id: rs_id.into(),
            allele_1,
            allele_2,
        }
    }
}

/// A variant record with its alleles oriented as reference and alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub chromosome: String,
    pub position: u64,
    pub rs_id: String,

    /// The allele equal to the reference base
    #[serde(rename = "ref")]
    pub reference: Base,

    /// The other allele
    #[serde(rename = "alt")]
    pub alternate: Base,
}

impl ClassificationResult {
    /// Orient `record` so that `reference` comes first.
    pub fn new(record: &VariantRecord, reference: Base, alternate: Base) -> Self {
        Self {
            chromosome: record.chromosome.clone(),
            position: record.position,
            rs_id: record.rs_id.clone(),
            reference,
            alternate,
        }
    }

    /// Format as a tab-separated output row (no trailing newline)
    #[must_use]
    pub fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.chromosome, self.position, self.rs_id, self.reference, self.alternate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_result_row() {
        let record = VariantRecord::new("chr1", 100, "rs124", Base::T, Base::A);
        let result = ClassificationResult::new(&record, record.allele_2, record.allele_1);
        assert_eq!(result.to_tsv_row(), "chr1\t100\trs124\tA\tT");
    }

    #[test]
    fn test_classification_result_json_field_names() {
        let record = VariantRecord::new("chr2", 5, "rs1", Base::C, Base::G);
        let result = ClassificationResult::new(&record, Base::C, Base::G);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ref"], "C");
        assert_eq!(json["alt"], "G");
        assert_eq!(json["position"], 5);
    }
}
