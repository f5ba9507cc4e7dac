use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod parsing;
mod reference;
mod resolve;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("allele_resolver=debug,info")
    } else {
        EnvFilter::new("allele_resolver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Preprocess(args) => {
            cli::preprocess::run(args, cli.format)?;
        }
        cli::Commands::Split(args) => {
            cli::split::run(args, cli.format)?;
        }
        cli::Commands::Validate(args) => {
            cli::validate::run(args, cli.format)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format)?;
        }
    }

    Ok(())
}
