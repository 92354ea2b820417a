//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing::debug;

use cadastro_core::models::record::{ExtractionResult, Field};
use cadastro_core::CadastroConfig;

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadastro")
        .join("config.json")
}

/// Explicit `--config` path, else the default file when it exists.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CadastroConfig> {
    let path = config_file(config_path);

    if config_path.is_some() || path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(CadastroConfig::from_file(Path::new(&path))?)
    } else {
        Ok(CadastroConfig::default())
    }
}

/// Split text into blocks on blank lines, the way OCR regions arrive.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

pub fn format_record(record: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.key()))?;
    wtr.write_record(Field::ALL.iter().map(|f| record.get(*f).unwrap_or("")))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractionResult) -> String {
    if record.is_empty() {
        return "No fields found.\n".to_string();
    }

    let width = Field::ALL.iter().map(|f| f.key().len()).max().unwrap_or(0);
    let mut output = String::new();

    for field in record.present_fields() {
        if let Some(value) = record.get(field) {
            output.push_str(&format!("{:<width$}  {}\n", field.key(), value, width = width));
        }
    }

    output
}
