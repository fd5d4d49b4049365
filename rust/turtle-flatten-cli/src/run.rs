//! Subcommand implementations.
//!
//! File access happens on the tokio runtime; the conversion itself is CPU
//! bound and runs on the blocking pool. With `--timeout-secs` the conversion
//! carries a deadline and stops on its own once the deadline passes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};
use turtle_flatten::{
    Conversion, ConvertedDocument, FlattenConfig, flatten, flatten_until, parse_document,
    parse_document_until, read_converted,
};

use crate::{CliError, ConvertArgs, CsvArgs, Result, StatsArgs, UniqueStats, export_csv};

/// How long past its deadline a conversion may take to notice it.
const TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// What a `convert` run produced.
#[derive(Debug)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub lines: usize,
    pub diagnostics: usize,
    pub stats: Option<UniqueStats>,
}

/// Load the configuration file, if any, and apply command line overrides.
pub async fn load_config(args: &ConvertArgs) -> Result<FlattenConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read(path).await?;
            serde_json::from_str(&text).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => FlattenConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

#[instrument(skip_all, fields(input = %args.input.display()))]
pub async fn convert_file(args: &ConvertArgs) -> Result<ConvertReport> {
    let config = load_config(args).await?;
    let input = read(&args.input).await?;

    let limit = args.timeout_secs.map(Duration::from_secs);
    let deadline = limit.map(|limit| Instant::now() + limit);
    let task = tokio::task::spawn_blocking(move || convert_timed(&input, &config, deadline));
    let converted = match limit {
        Some(limit) => tokio::time::timeout(limit + TIMEOUT_GRACE, task)
            .await
            .map_err(|_| CliError::Timeout(limit))??,
        None => task.await?,
    };
    let conversion = match (converted, limit) {
        (Err(error), Some(limit)) if error.is_deadline() => {
            return Err(CliError::Timeout(limit));
        }
        (converted, _) => converted?,
    };

    for diagnostic in &conversion.diagnostics {
        warn!(%diagnostic, "skipped malformed input");
    }

    let output = args.output_path();
    write(&output, conversion.to_string()).await?;
    info!(
        output = %output.display(),
        lines = conversion.lines.len(),
        diagnostics = conversion.diagnostics.len(),
        "wrote converted lines"
    );

    if let Some(csv) = &args.csv {
        export_csv(csv, &conversion.lines, ',').await?;
        info!(csv = %csv.display(), "exported CSV");
    }

    Ok(ConvertReport {
        output,
        lines: conversion.lines.len(),
        diagnostics: conversion.diagnostics.len(),
        stats: args.stats.then(|| UniqueStats::collect(&conversion.lines)),
    })
}

/// Run both pipeline stages, logging how long each one took.
///
/// With a `deadline`, each stage stops between clauses or subjects once the
/// deadline has passed.
fn convert_timed(
    input: &str,
    config: &FlattenConfig,
    deadline: Option<Instant>,
) -> turtle_flatten::Result<Conversion> {
    let started = Instant::now();
    let parsed = match deadline {
        Some(deadline) => parse_document_until(input, config, deadline)?,
        None => parse_document(input, config),
    };
    info!(
        elapsed = ?started.elapsed(),
        sections = parsed.table.len(),
        "preprocessing finished"
    );

    let started = Instant::now();
    let flattened = match deadline {
        Some(deadline) => flatten_until(&parsed.table, config, deadline)?,
        None => flatten(&parsed.table, config),
    };
    info!(
        elapsed = ?started.elapsed(),
        lines = flattened.lines.len(),
        "conversion finished"
    );

    Ok(Conversion::assemble(parsed, flattened))
}

#[instrument(skip_all, fields(input = %args.input.display()))]
pub async fn csv_file(args: &CsvArgs) -> Result<usize> {
    let document = read_document(&args.input).await?;
    export_csv(&args.output, &document.lines, args.delimiter).await?;
    info!(output = %args.output.display(), records = document.lines.len(), "exported CSV");
    Ok(document.lines.len())
}

#[instrument(skip_all, fields(input = %args.input.display()))]
pub async fn stats_file(args: &StatsArgs) -> Result<UniqueStats> {
    let document = read_document(&args.input).await?;
    Ok(UniqueStats::collect(&document.lines))
}

async fn read_document(path: &Path) -> Result<ConvertedDocument> {
    let text = read(path).await?;
    Ok(read_converted(&text)?)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })
}

async fn write(path: &Path, contents: String) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| CliError::Write {
            path: path.to_owned(),
            source,
        })
}
