use std::path::PathBuf;

use clap::Args;

use crate::cli::{print_json, OutputFormat};
use crate::parsing::fp_snps::{self, PreprocessSummary};

#[derive(Args)]
pub struct PreprocessArgs {
    /// GRAF fingerprint SNP list (e.g. FP_SNPs.txt, optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output table (default: FP_SNPs_10k_GB38_twoAllelsFormat.tsv next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute preprocess subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PreprocessArgs, format: OutputFormat) -> anyhow::Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| fp_snps::default_output_path(&args.input));

    let summary = fp_snps::preprocess_file(&args.input, &output)?;

    match format {
        OutputFormat::Text => print_text_summary(&output, &summary),
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": output.display().to_string(),
            "summary": summary,
        }))?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(output: &std::path::Path, summary: &PreprocessSummary) {
    println!("Preprocessing complete");
    println!("  Output: {}", output.display());
    println!("  SNPs written: {}", summary.written);
    println!("  Short lines skipped: {}", summary.skipped_short);
    println!(
        "  {} rows skipped: {}",
        fp_snps::EXCLUDED_CHROMOSOME,
        summary.skipped_excluded
    );
}

fn print_tsv_summary(summary: &PreprocessSummary) {
    println!("written\tskipped_short\tskipped_excluded");
    println!(
        "{}\t{}\t{}",
        summary.written, summary.skipped_short, summary.skipped_excluded
    );
}
