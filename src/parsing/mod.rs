//! Parsers and writers for the files around reference allele resolution.
//!
//! This module provides:
//!
//! - **Fingerprint SNP lists** ([`fp_snps`]): Normalize a GRAF `FP_SNPs.txt` dump
//! - **Reference FASTA** ([`fasta`]): Split a genome FASTA into per-chromosome files
//! - **Variant tables** ([`tsv`]): Validate input tables and write resolved tables
//!
//! ## Table formats
//!
//! | Table    | Header                                   |
//! |----------|------------------------------------------|
//! | Input    | `#CHROM  POS  RS_ID  ALLELE_1  ALLELE_2` |
//! | Resolved | `#CHROM  POS  RS_ID  REF  ALT`           |
//!
//! Columns are tab-separated.

pub mod fasta;
pub mod fp_snps;
pub mod tsv;
