use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gapscan_cli::{list_page_files, read_page, report_path, summary_line, write_report};
use gapscan_core::config::{expand_path, resolve_with_base, Config};
use gapscan_engine::ContentGapEngine;
use gapscan_gaps::ScoreBreakdown;

#[derive(Parser, Debug)]
#[command(name = "gapscan", version, about = "Keyword clustering and content-gap detection for pre-embedded pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a single page bundle and print the report as JSON
    Analyze {
        page: String,
        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<String>,
        /// Override ranking.top_n (0 keeps every gap)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Analyse every *.json page bundle under a directory
    Batch {
        dir: String,
        /// Report directory; relative paths resolve against <DIR>
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Show the opportunity score breakdown for a position/impressions pair
    Score {
        #[arg(long)]
        position: f64,
        #[arg(long)]
        impressions: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze { page, out, top } => {
            let mut config = Config::load()?.engine()?;
            if let Some(top) = top {
                config.ranking.top_n = top;
            }
            let engine = ContentGapEngine::new(config)?;
            let page = read_page(&expand_path(&page))?;
            let report = engine.run(&page)?;
            match out {
                Some(out) => {
                    let out = expand_path(out);
                    write_report(&out, &report)?;
                    info!(path = %out.display(), "report written");
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Command::Batch { dir, out_dir } => {
            let engine = ContentGapEngine::new(Config::load()?.engine()?)?;
            let root = expand_path(&dir);
            let out_dir = out_dir.map(|d| resolve_with_base(&root, d));
            let files = list_page_files(&root);
            if files.is_empty() {
                println!("No page bundles found under {}.", root.display());
                return Ok(());
            }

            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")?
                    .progress_chars("#>-"),
            );
            let mut failed = 0usize;
            for file in &files {
                pb.set_message(file.display().to_string());
                let outcome = read_page(file).and_then(|page| {
                    let report = engine.run(&page)?;
                    write_report(&report_path(file, out_dir.as_deref()), &report)?;
                    Ok(report)
                });
                match outcome {
                    Ok(report) => pb.println(summary_line(&report)),
                    Err(err) => {
                        failed += 1;
                        error!(path = %file.display(), "{err:#}");
                    }
                }
                pb.inc(1);
            }
            pb.finish_with_message("done");
            println!("Processed {} page bundles ({} failed)", files.len(), failed);
        }
        Command::Score { position, impressions } => {
            let breakdown = ScoreBreakdown::new(position, impressions);
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
    }
    Ok(())
}
