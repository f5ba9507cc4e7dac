use std::path::PathBuf;

use clap::Args;

use crate::cli::{print_json, OutputFormat};
use crate::parsing::tsv::parse_variant_table_file;

#[derive(Args)]
pub struct ValidateArgs {
    /// Variant table (#CHROM, POS, RS_ID, ALLELE_1, ALLELE_2)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns the first schema violation found in the table.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let table = parse_variant_table_file(&args.input)
        .map_err(|e| anyhow::anyhow!("Validation of {} failed: {e}", args.input.display()))?;
    let chromosomes = table.chromosomes();

    match format {
        OutputFormat::Text => {
            println!("TSV file validation passed.");
            println!("  Records: {}", table.len());
            println!("  Chromosomes: {}", chromosomes.len());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "input": args.input.display().to_string(),
            "valid": true,
            "records": table.len(),
            "chromosomes": chromosomes,
        }))?,
        OutputFormat::Tsv => {
            println!("valid\trecords\tchromosomes");
            println!("true\t{}\t{}", table.len(), chromosomes.len());
        }
    }

    Ok(())
}
