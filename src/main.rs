use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gamedex_dedup::catalog::{load_raw_games, write_output};
use gamedex_dedup::dedup::run_pipeline;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the raw catalog dump: a JSON file or a directory of JSON files.
    #[clap(value_parser = parse_path)]
    pub input: PathBuf,

    /// Directory to write the cleaned relations into.
    #[clap(value_parser = parse_path)]
    pub output: PathBuf,

    /// Pretty-print the output JSON files.
    #[clap(long, default_value_t = false)]
    pub pretty: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Loading raw records from {:?}...", cli_args.input);
    let batch = load_raw_games(&cli_args.input)?;
    if !batch.problems.is_empty() {
        warn!("{} records loaded with problems", batch.problems.len());
    }

    let output = run_pipeline(&batch.games)?;
    write_output(
        &output,
        &cli_args.output,
        &cli_args.input.display().to_string(),
        cli_args.pretty,
    )?;

    info!("Done");
    Ok(())
}
