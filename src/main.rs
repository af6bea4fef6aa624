//! Gemstone pipeline entry point

use clap::Parser;
use gemprice::cli::{cmd_ingest, cmd_run, cmd_transform, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemprice=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            source,
            artifacts_dir,
            test_fraction,
            seed,
        } => {
            cmd_ingest(&source, &artifacts_dir, test_fraction, seed)?;
        }
        Commands::Transform {
            train,
            eval,
            artifact,
        } => {
            cmd_transform(&train, &eval, &artifact)?;
        }
        Commands::Run {
            source,
            artifacts_dir,
        } => {
            cmd_run(&source, &artifacts_dir)?;
        }
    }

    Ok(())
}
