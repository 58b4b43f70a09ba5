use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use gamedex_dedup::catalog::{read_metadata, read_output};
use gamedex_dedup::dedup::OutputStats;

/// Print summary statistics for a previously written output directory.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the cleaned relations and run manifest.
    pub output_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let metadata = read_metadata(&cli_args.output_dir)?;
    let output = read_output(&cli_args.output_dir)?;
    let stats = OutputStats::collect(&output);

    println!("Source:    {}", metadata.source);
    println!("Processed: {}", metadata.processed_at);
    println!();
    print!("{}", stats);
    Ok(())
}
