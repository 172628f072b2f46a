use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use injury_report_engine::{
    BatchOutcome, BatchWindow, EngineOptions, GridSource, MemoryGridSource, OutputFormat,
    PageSelection, PdfTextGridSource, ProcessedManifest, process_batch, write_records,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "injury2records",
    version,
    about = "Rebuild injury-report PDF tables into one record per player"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract player records from one or more reports.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input report path. Repeatable; processed in the given order.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path.
    #[arg(short, long)]
    output: PathBuf,

    /// Output format: csv, ndjson or json.
    #[arg(long, default_value = "csv")]
    format: String,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Stop after this many pages per document.
    #[arg(long, default_value_t = 50)]
    max_pages: u32,

    /// Leading rows of page 1 searched for the column header.
    #[arg(long, default_value_t = 1)]
    header_scan_rows: usize,

    /// Do not carry game date, time, matchup and team down to later rows.
    #[arg(long)]
    no_context: bool,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// JSON manifest of already processed files; updated after the run.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Index of the first input to process.
    #[arg(long, default_value_t = 0)]
    start_from: usize,

    /// Number of inputs to process in this run.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Treat inputs as JSON grid dumps instead of PDFs.
    #[arg(long)]
    grid_json: bool,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<EngineOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }
    if args.max_pages == 0 {
        anyhow::bail!("--max-pages must be at least 1");
    }

    Ok(EngineOptions {
        pages,
        max_pages: args.max_pages,
        header_scan_rows: args.header_scan_rows.max(1),
        propagate_context: !args.no_context,
        delimiter: args.delimiter as u8,
    })
}

fn log_outcome(outcome: &BatchOutcome, verbose: bool) {
    let summary = &outcome.summary;
    if summary.failed > 0 || summary.empty > 0 {
        eprintln!(
            "warning: {} of {} document(s) produced no records: {}",
            summary.failed + summary.empty,
            summary.selected,
            summary.failed_files.join(", ")
        );
    }
    if let Some(next) = summary.next_start_from {
        eprintln!("note: more inputs remain; continue with --start-from {next}");
    }
    if !verbose {
        return;
    }

    eprintln!(
        "processed {} document(s): {} succeeded, {} empty, {} failed, {} skipped, {} record(s), {:.1}% success",
        summary.selected,
        summary.succeeded,
        summary.empty,
        summary.failed,
        summary.skipped,
        summary.total_records,
        summary.success_rate
    );
    for report in &outcome.documents {
        for warning in &report.warnings {
            eprintln!(
                "  - {} {:?} page={:?} row={:?}: {}",
                report.source_file, warning.code, warning.page, warning.row, warning.message
            );
        }
    }
}

fn run_with_source<S: GridSource>(
    source: &S,
    args: &ExtractArgs,
    options: &EngineOptions,
) -> Result<BatchOutcome> {
    let format = OutputFormat::from_str(&args.format)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --format")?;

    let mut manifest = match &args.manifest {
        Some(path) => ProcessedManifest::load(path)
            .with_context(|| format!("failed to read manifest '{}'", path.display()))?,
        None => ProcessedManifest::new(),
    };

    let window = BatchWindow {
        start_from: args.start_from,
        batch_size: args.batch_size,
    };
    let outcome = process_batch(source, &args.inputs, window, &mut manifest, options);

    write_records(&args.output, &outcome.records, format, options.delimiter)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    if let Some(path) = &args.manifest {
        manifest
            .save(path)
            .with_context(|| format!("failed to write manifest '{}'", path.display()))?;
    }

    Ok(outcome)
}

fn run_extract(args: &ExtractArgs) -> Result<BatchOutcome> {
    let options = parse_options(args)?;
    if args.grid_json {
        let source = MemoryGridSource::from_dump_files(&args.inputs)
            .context("failed to load grid dumps")?;
        run_with_source(&source, args, &options)
    } else {
        run_with_source(&PdfTextGridSource::new(), args, &options)
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("injury_report_engine=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(outcome) => {
                log_outcome(&outcome, args.verbose);
                if outcome.records.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
