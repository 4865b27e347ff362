// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwerk — render case labels for a table of records.
//
//   labelwerk render --records stock.json [--config render.json] [--clean]
//   labelwerk count  --records stock.json
//
// Records are a JSON array of objects using the spreadsheet column names
// (`Sku`, `Product`, `Flavour`, `Strength`, `Outstanding`, `Case_Size`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use labelwerk_core::{LabelError, LabelRecord, RenderConfig, Result, plan_copies};
use labelwerk_render::{LabelRenderer, clear_label_files};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "labelwerk", version)]
#[command(about = "Labelwerk — print-ready case labels with auto-fit text and Code 128 barcodes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one PNG per required label copy
    Render(RenderArgs),

    /// Print how many labels each record needs
    Count {
        /// JSON array of records
        #[arg(short, long)]
        records: PathBuf,

        /// Case size for records that have none
        #[arg(long)]
        default_case_size: Option<f64>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// JSON array of records
    #[arg(short, long)]
    records: PathBuf,

    /// JSON render configuration; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Label side length in centimetres
    #[arg(long)]
    side_cm: Option<f32>,

    /// Case size for records that have none
    #[arg(long)]
    default_case_size: Option<f64>,

    /// Remove existing label images from the output directory first
    #[arg(long)]
    clean: bool,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Render(args) => run_render(&args),
        Commands::Count {
            records,
            default_case_size,
        } => run_count(&records, default_case_size),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "labelwerk failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

// -- Input ---------------------------------------------------------------------

fn load_records(path: &Path) -> Result<Vec<LabelRecord>> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<LabelRecord> = serde_json::from_str(&text)?;
    info!(path = %path.display(), records = records.len(), "Records loaded");
    Ok(records)
}

/// Configuration file (or defaults) with command-line overrides applied.
fn build_config(args: &RenderArgs) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }
    if let Some(side_cm) = args.side_cm {
        config.label_side_cm = side_cm;
    }
    if args.default_case_size.is_some() {
        config.default_case_size = args.default_case_size;
    }
    config.validate()?;
    Ok(config)
}

// -- Commands --------------------------------------------------------------------

fn run_render(args: &RenderArgs) -> Result<ExitCode> {
    let config = build_config(args)?;
    let records = load_records(&args.records)?;

    if args.clean {
        clear_label_files(&config.output_dir)?;
    }

    let jobs = plan_copies(&records, config.default_case_size);
    let renderer = LabelRenderer::new(config)?;
    let report = match args.jobs {
        Some(threads) => renderer.render_and_save_with_threads(&jobs, threads)?,
        None => renderer.render_and_save(&jobs),
    };

    println!(
        "{} label(s) from {} record(s) written to {}",
        report.saved.len(),
        jobs.len(),
        renderer.config().output_dir.display()
    );
    for failure in &report.failures {
        eprintln!(
            "  record {} copy {}: {}",
            failure.index, failure.stem, failure.error
        );
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn count_table(records: &[LabelRecord], default_case_size: Option<f64>) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.is_blank())
        .map(|(index, record)| {
            format!(
                "{index:>5}  {:<20}  {:>6}",
                record.identifier.as_deref().unwrap_or("-"),
                record.label_count(default_case_size)
            )
        })
        .collect()
}

fn run_count(path: &Path, default_case_size: Option<f64>) -> Result<ExitCode> {
    if default_case_size.is_some_and(|size| !size.is_finite() || size <= 0.0) {
        return Err(LabelError::Config(
            "default case size must be a positive number".into(),
        ));
    }
    let records = load_records(path)?;
    println!("{:>5}  {:<20}  {:>6}", "row", "sku", "labels");
    for line in count_table(&records, default_case_size) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}
