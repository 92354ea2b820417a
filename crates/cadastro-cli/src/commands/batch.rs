//! Batch processing command for multiple text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use cadastro_core::{ExtractionResult, FormParser};

use super::{format_record, load_config, split_blocks, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(FormParser::from_config(&config)?.with_diagnostics(false));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (order, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let parser = Arc::clone(&parser);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &parser);
            let processing_time_ms = file_start.elapsed().as_millis() as u64;

            let (record, error) = match outcome {
                Ok(record) => (Some(record), None),
                Err(e) => (None, Some(e.to_string())),
            };
            (order, ProcessResult { path, record, error, processing_time_ms })
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (order, result) = joined?;
        pb.inc(1);

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }
        results.push((order, result));
    }

    pb.finish_with_message("Complete");

    results.sort_by_key(|(order, _)| *order);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(record) = &result.record {
                let output_name = result.path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("record");

                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));
                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&results, start.elapsed());

    Ok(())
}

fn print_report(results: &[ProcessResult], elapsed: Duration) {
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let fields: usize = results
        .iter()
        .filter_map(|r| r.record.as_ref())
        .map(|record| record.present_fields().len())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?} ({} fields extracted)",
        style("✓").green(),
        results.len(),
        elapsed,
        fields
    );
    println!(
        "   {} ok, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    for result in failed {
        println!(
            "   {} {}: {}",
            style("✗").red(),
            result.path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn process_single_file(path: &Path, parser: &FormParser) -> anyhow::Result<ExtractionResult> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("File is empty");
    }

    let report = parser.parse(&split_blocks(&text));
    debug!(
        "{}: {} lines in {}ms",
        path.display(),
        report.line_count,
        report.processing_time_ms
    );
    Ok(report.result)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "tax_id_company",
        "tax_id_person",
        "name",
        "email",
        "phone",
        "city",
        "state",
        "fields_found",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &result.record {
            wtr.write_record([
                filename,
                "success",
                record.tax_id_company.as_deref().unwrap_or(""),
                record.tax_id_person.as_deref().unwrap_or(""),
                record.name.as_deref().unwrap_or(""),
                record.email.as_deref().unwrap_or(""),
                record.phone.as_deref().unwrap_or(""),
                record.city.as_deref().unwrap_or(""),
                record.state.as_deref().unwrap_or(""),
                &record.present_fields().len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "0",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
