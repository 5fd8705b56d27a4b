mod artifact;
mod cli;
mod config;
mod cursor;
mod error;
mod extract;
mod fallback;
mod git;
mod metadata;
mod orchestrator;
mod pipeline;
mod prompt;
mod state_machine;
mod ui;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::BriefConfig;
use extract::ExtractorRegistry;
use git::TranscriptScanner;
use pipeline::BriefPipeline;
use ui::JobProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = BriefConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Run(args) => {
            args.apply_to(&mut config);
            let label = args.transcript.display().to_string();
            let pipeline = BriefPipeline::new(config, ExtractorRegistry::default(), JobProgress::start(&label));

            match pipeline.run(&args.request()).await {
                Ok(outcome) => pipeline.progress().finish(&outcome),
                Err(e) => {
                    pipeline.progress().fail(&e.to_string());
                    return Err(e).with_context(|| format!("failed to generate brief for {label}"));
                }
            }
        }
        Command::Changed { base, head, roots } => {
            let roots = if roots.is_empty() { config.transcript_roots } else { roots };
            let scanner = TranscriptScanner::open(Path::new(".")).context("failed to open git repository")?;
            for path in scanner.changed_transcripts(&base, &head, &roots)? {
                println!("{path}");
            }
        }
    }

    Ok(())
}
