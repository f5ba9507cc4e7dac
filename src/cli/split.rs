use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{print_json, LayoutArgs, OutputFormat};
use crate::parsing::fasta::{split_reference, SplitSummary};

#[derive(Args)]
pub struct SplitArgs {
    /// Reference genome FASTA (e.g. GRCh38.d1.vd1.fa, optionally gzipped)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Directory for the per-chromosome files (default: the reference's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute split subcommand
///
/// # Errors
///
/// Returns an error if the reference cannot be read or an output file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SplitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dir = args.output_dir.clone().unwrap_or_else(|| {
        args.reference
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let layout = args.layout.layout(dir);

    let summary = split_reference(&args.reference, &layout)?;

    match format {
        OutputFormat::Text => print_text_summary(&layout.dir, &summary),
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Tsv => print_tsv_summary(&layout, &summary),
    }

    Ok(())
}

fn print_text_summary(dir: &Path, summary: &SplitSummary) {
    println!("Split complete");
    println!("  Output directory: {}", dir.display());
    println!("  Chromosomes written: {}", summary.chromosomes.len());
    println!("  Records skipped: {}", summary.skipped.len());
}

fn print_tsv_summary(layout: &crate::reference::ReferenceLayout, summary: &SplitSummary) {
    println!("chromosome\tpath");
    for chromosome in &summary.chromosomes {
        println!("{}\t{}", chromosome, layout.path_for(chromosome).display());
    }
}
