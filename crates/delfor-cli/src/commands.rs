//! Command implementations

use anyhow::Context;
use delfor_edifact::{DelforParser, decode_interchange};
use delfor_export::{DeliveryWriter, ExportConfig, ExportOutcome};
use delfor_model::{Dialect, Entities, Summary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;

/// One parsed input file
#[derive(Debug, Serialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub entities: Entities,
}

/// Read and parse one interchange. The parse itself runs on the blocking pool.
async fn parse_one(path: PathBuf, parser: DelforParser) -> anyhow::Result<ParsedFile> {
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Cannot read interchange '{}'", path.display()))?;
    let entities = tokio::task::spawn_blocking(move || parser.parse(&decode_interchange(&data)))
        .await
        .context("Parse task failed")?;
    debug!(path = %path.display(), deliveries = entities.deliveries.len(), "Parsed interchange");
    Ok(ParsedFile { path, entities })
}

/// Parse every input independently and concurrently, keeping input order
pub async fn parse_files(inputs: Vec<PathBuf>, dialect: Dialect) -> anyhow::Result<Vec<ParsedFile>> {
    let parser = DelforParser::new(dialect);
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|path| tokio::spawn(parse_one(path, parser)))
        .collect();

    let mut parsed = Vec::with_capacity(handles.len());
    for handle in handles {
        parsed.push(handle.await.context("Parse task failed")??);
    }
    Ok(parsed)
}

/// `delfor parse`: print the entities of every input as JSON
pub async fn run_parse(inputs: Vec<PathBuf>, dialect: Dialect, pretty: bool) -> anyhow::Result<()> {
    info!(%dialect, files = inputs.len(), "Parsing interchanges");
    let parsed = parse_files(inputs, dialect).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    println!("{json}");

    let deliveries: usize = parsed.iter().map(|file| file.entities.deliveries.len()).sum();
    eprintln!("Parse summary: files={}, deliveries={deliveries}", parsed.len());
    Ok(())
}

/// `delfor summary`: print delivery statistics for one input
pub async fn run_summary(input: PathBuf, dialect: Dialect, json: bool) -> anyhow::Result<()> {
    let parsed = parse_one(input, DelforParser::new(dialect)).await?;
    let summary = Summary::from_entities(&parsed.entities);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&parsed.path, &summary));
    }
    Ok(())
}

fn render_summary(path: &Path, summary: &Summary) -> String {
    let mut out = format!(
        "{}\n  deliveries: {}\n  distinct parts: {}\n  total quantity: {}\n",
        path.display(),
        summary.deliveries,
        summary.distinct_parts,
        summary.total_quantity
    );
    for (title, buckets) in [
        ("by condition", &summary.by_condition),
        ("by quantity type", &summary.by_quantity_type),
    ] {
        if buckets.is_empty() {
            continue;
        }
        out.push_str(&format!("  {title}:\n"));
        for bucket in buckets {
            out.push_str(&format!(
                "    {:<28} rows={:<4} quantity={}\n",
                bucket.label, bucket.count, bucket.quantity
            ));
        }
    }
    out
}

/// Export-specific command-line overrides
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub delimiter: Option<char>,
    pub no_header: bool,
}

/// `delfor export`: write the delivery rows of one input as CSV
pub async fn run_export(
    input: PathBuf,
    output: PathBuf,
    dialect: Dialect,
    options: ExportOptions,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let ParsedFile { path: input, entities } = parse_one(input, DelforParser::new(dialect)).await?;

    let export_config = ExportConfig::new()
        .delimiter(options.delimiter.unwrap_or(config.delimiter))
        .has_header(!options.no_header)
        .fallback_location(config.fallback_location(dialect));
    let writer = DeliveryWriter::new().with_config(export_config);

    let destination = output.clone();
    let outcome = tokio::task::spawn_blocking(move || writer.write_to_path(&destination, &entities))
        .await
        .context("Export task failed")?
        .with_context(|| format!("Export to '{}' failed", output.display()))?;

    match outcome {
        ExportOutcome::Written { rows } => {
            info!(rows, output = %output.display(), "Export finished");
            eprintln!("Exported {rows} delivery rows to {}", output.display());
        }
        ExportOutcome::NothingToExport => {
            eprintln!("WARNING: no delivery rows to export from {}", input.display());
        }
    }
    Ok(())
}
