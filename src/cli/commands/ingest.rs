use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{create_spinner, key_value_table};
use crate::cli::types::IngestArgs;
use crate::domain::models::Config;
use crate::services::{IngestOptions, IngestReport, IngestionService};

/// Handle the ingest command
pub async fn execute(config: Config, args: IngestArgs, json: bool) -> Result<()> {
    let mut options = IngestOptions::from_config(&config);
    if let Some(data_dir) = args.data_dir {
        options.data_dir = data_dir;
    }
    if let Some(index) = args.index {
        options.index_dir = index;
    }
    options.reset = args.reset;

    let service = IngestionService::from_config(&config)
        .context("Failed to prepare ingestion")?;

    let spinner = create_spinner(
        &format!("Ingesting PDFs from {}", options.data_dir.display()),
        json,
    );
    let result = service.ingest(&options).await;
    spinner.finish_and_clear();

    let report = result.context("Ingestion failed")?;
    print_report(&report, &options.index_dir, json)
}

fn print_report(report: &IngestReport, index_dir: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Ingestion complete:");
    println!(
        "{}",
        key_value_table([
            ("Index", index_dir.display().to_string()),
            ("Pages", report.documents.to_string()),
            ("Chunks", report.chunks.to_string()),
            ("Records written", report.records.to_string()),
            ("Sources", report.sources.join(", ")),
        ])
    );

    Ok(())
}
