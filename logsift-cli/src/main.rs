mod cli;
mod prompt;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use logsift_core::{run_pipeline, PipelineOptions, PipelineReport, TracingProgress};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Run {
            input,
            output,
            keywords,
            level,
            pattern,
            no_expand,
            delete_archives,
            settle_delay_ms,
            format,
        } => {
            let options = PipelineOptions {
                keywords,
                level,
                pattern,
                expand_archives: !no_expand,
                delete_archives,
                settle_delay: Some(Duration::from_millis(settle_delay_ms)),
            };
            let report = run_pipeline(
                Path::new(&input),
                Path::new(&output),
                &options,
                &TracingProgress,
            )?;
            print_report(&report, &format)?;
        }

        Commands::Interactive => {
            let run = prompt::collect()?;
            let options = PipelineOptions {
                keywords: run.keywords,
                level: run.level,
                pattern: run.pattern,
                settle_delay: Some(Duration::from_secs(1)),
                ..Default::default()
            };
            let report = run_pipeline(
                Path::new(&run.input_dir),
                Path::new(&run.output_dir),
                &options,
                &TracingProgress,
            )?;
            print_report(&report, "text")?;
        }

        Commands::Serve { port } => {
            let mut config = logsift_web::WebConfig::load()?;
            if let Some(port) = port {
                config.port = port;
            }
            logsift_web::serve(config).await?;
        }
    }

    Ok(())
}

fn print_report(report: &PipelineReport, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => {
            println!("Files scanned:         {}", report.files_scanned);
            println!("Files matched:         {}", report.files_matched);
            println!("Lines matched:         {}", report.lines_matched);
            println!("Archives extracted:    {}", report.archives_extracted);
            println!("Summary files written: {}", report.summary_files_written);
        }
    }
    Ok(())
}
