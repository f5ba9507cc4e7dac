use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::{print_json, LayoutArgs, OutputFormat};
use crate::parsing::tsv::{parse_variant_table_file, write_results_file};
use crate::reference::store::SequenceStore;
use crate::resolve::engine::{ResolutionEngine, ResolutionSummary};

#[derive(Args)]
pub struct ResolveArgs {
    /// Directory holding the per-chromosome reference FASTA files
    #[arg(short, long, required = true)]
    pub reference_dir: PathBuf,

    /// Variant table to resolve (#CHROM, POS, RS_ID, ALLELE_1, ALLELE_2)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output table (#CHROM, POS, RS_ID, REF, ALT)
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute resolve subcommand
///
/// Every chromosome named by the table is opened before any record is resolved.
/// The output file is only written once every record has been resolved; a failed
/// run leaves no output behind.
///
/// # Errors
///
/// Returns an error if the table is invalid, a chromosome file is missing or
/// unreadable, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let table = parse_variant_table_file(&args.input)
        .map_err(|e| anyhow::anyhow!("Validation of {} failed: {e}", args.input.display()))?;

    let mut store = SequenceStore::new(args.layout.layout(&args.reference_dir));
    store.preload(table.chromosomes())?;
    info!(
        "Opened {} indexed chromosome references",
        store.indexed_chromosomes()
    );

    let resolution = ResolutionEngine::new(&mut store).resolve(&table.records)?;

    write_results_file(&args.output, &resolution.results)?;

    match format {
        OutputFormat::Text => print_text_summary(&args, &resolution.summary),
        OutputFormat::Json => print_json(&serde_json::json!({
            "input": args.input.display().to_string(),
            "output": args.output.display().to_string(),
            "summary": resolution.summary,
        }))?,
        OutputFormat::Tsv => print_tsv_summary(&resolution.summary),
    }

    Ok(())
}

fn print_text_summary(args: &ResolveArgs, summary: &ResolutionSummary) {
    println!("Reference allele resolution complete");
    println!("  Output: {}", args.output.display());
    println!("  Records: {}", summary.records);
    println!("  Resolved: {}", summary.emitted);
    println!("  Dropped (no allele matches reference): {}", summary.dropped);
    if summary.outside_sequence > 0 {
        println!("    of which past the chromosome end: {}", summary.outside_sequence);
    }
}

fn print_tsv_summary(summary: &ResolutionSummary) {
    println!("records\tresolved\tdropped\toutside_sequence");
    println!(
        "{}\t{}\t{}\t{}",
        summary.records, summary.emitted, summary.dropped, summary.outside_sequence
    );
}
