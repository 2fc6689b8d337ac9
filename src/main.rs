//! CLI entry point for paperdrop.

use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use paperdrop_core::{ArxivClient, PdfFetcher, Pipeline, ProgressReporter, bibtex};
use tracing::{debug, error, info, warn};

mod cli;
mod console;

use cli::Args;
use console::{ConsoleSink, FileDelivery};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let resolver = ArxivClient::new();
    let fetcher = PdfFetcher::new();
    let delivery = FileDelivery::new(&args.output_dir);
    let pipeline = Pipeline::new(&resolver, &fetcher, &delivery, &args.output_dir);

    if let Some(bib_path) = &args.bib {
        let bib_text = std::fs::read_to_string(bib_path)
            .with_context(|| format!("failed to read bibliography {}", bib_path.display()))?;
        let job = bibtex::extract_titles(&bib_text);
        debug!(entries = job.total(), "parsed bibliography");

        let mut reporter = ProgressReporter::new(ConsoleSink::new());
        let stats = pipeline.run_batch(&job, &mut reporter).await?;

        info!(
            delivered = stats.delivered,
            not_found = stats.not_found,
            skipped = stats.skipped,
            failed = stats.failed,
            "batch complete"
        );
        ensure!(
            stats.failed == 0,
            "{} of {} entries failed",
            stats.failed,
            stats.total()
        );
        return Ok(());
    }

    // Read references: from positional args or stdin
    let references: Vec<String> = if args.references.is_empty() {
        if io::stdin().is_terminal() {
            info!("No input provided. Pipe references via stdin or pass as arguments.");
            info!("Example: paperdrop 'https://arxiv.org/abs/1706.03762'");
            return Ok(());
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect()
    } else {
        args.references.clone()
    };

    // Each reference owns its transcript; runs are strictly sequential.
    let mut failures = 0usize;
    for reference in &references {
        let mut reporter = ProgressReporter::new(ConsoleSink::new());
        match pipeline.process_reference(reference, &mut reporter).await {
            Ok(outcome) => debug!(reference = %reference, ?outcome, "reference processed"),
            Err(e) => {
                error!(reference = %reference, error = %e, "reference failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!(failures, total = references.len(), "some references failed");
    }
    ensure!(
        failures == 0,
        "{failures} of {} reference(s) failed",
        references.len()
    );
    Ok(())
}
