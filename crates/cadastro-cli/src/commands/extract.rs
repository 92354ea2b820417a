//! Extract command - pull a registration record out of one text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use cadastro_core::FormParser;

use super::{format_record, load_config, split_blocks, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include what each strategy tried (JSON only)
    #[arg(long)]
    diagnostics: bool,

    /// Disable OCR error correction
    #[arg(long)]
    no_ocr_correction: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    let blocks = split_blocks(&text);
    info!("Extracting from {} ({} blocks)", args.input.display(), blocks.len());

    let mut parser = FormParser::from_config(&config)?.with_diagnostics(args.diagnostics);
    if args.no_ocr_correction {
        parser = parser.with_ocr_correction(false);
    }

    let report = parser.parse(&blocks);

    let output = match args.format {
        OutputFormat::Json if args.diagnostics => serde_json::to_string_pretty(&report)?,
        format => format_record(&report.result, format)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &PathBuf) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}
