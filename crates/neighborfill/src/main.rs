//! CLI entry point for the CSV cleaning tool.

use anyhow::{Result, anyhow};
use clap::Parser;
use neighborfill::{CleanConfig, CleaningPipeline, RunSummary, write_summary_to_file};
use std::path::Path;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "CSV cleaning tool: fills missing values from nearby rows",
    long_about = "Cleans tabular data by replacing missing values with randomly chosen\n\
                  nearby values from the same column, then saves the result.\n\n\
                  EXAMPLES:\n  \
                  # Clean a CSV in place-adjacent output\n  \
                  neighborfill -i data.csv\n\n  \
                  # Reproducible run with an explicit seed\n  \
                  neighborfill -i data.csv --seed 42 -o results/\n\n  \
                  # Convert, clean and sort an Excel sheet\n  \
                  neighborfill -i bookings.xlsx --sort-column adr\n\n  \
                  # Machine-readable output\n  \
                  neighborfill -i data.csv --json | jq .imputation.total_replaced"
)]
struct Args {
    /// Path to the input file (CSV, Excel, or JSON)
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned file
    #[arg(short, long, default_value = ".")]
    output: String,

    /// Custom output file name (with extension)
    ///
    /// If not specified, uses "cleaned_<input name>.csv"
    #[arg(long)]
    output_name: Option<String>,

    /// Column to sort by after cleaning
    ///
    /// Numeric columns sort descending, textual columns ascending
    #[arg(short, long)]
    sort_column: Option<String>,

    /// Disable the chronological fallback sort for arrival date columns
    #[arg(long)]
    no_date_sort: bool,

    /// Seed for the random neighbor choice (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Text encoding of the input file
    #[arg(long, default_value = "latin1")]
    input_encoding: String,

    /// Text encoding of the cleaned output file
    #[arg(long, default_value = "macintosh")]
    output_encoding: String,

    /// Neighbor-search window, in rows per direction
    #[arg(long, default_value = "5")]
    window: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the final summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON summary
    #[arg(long)]
    json: bool,

    /// Write the run summary to <input_name>_report.json in the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    if !Path::new(&args.output).exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output);
    }

    let mut config_builder = CleanConfig::builder()
        .window(args.window)
        .input_encoding(&args.input_encoding)
        .output_encoding(&args.output_encoding)
        .auto_date_sort(!args.no_date_sort)
        .output_dir(&args.output);

    if let Some(ref column) = args.sort_column {
        config_builder = config_builder.sort_column(column);
    }
    if let Some(ref name) = args.output_name {
        config_builder = config_builder.output_name(name);
    }
    if let Some(seed) = args.seed {
        config_builder = config_builder.seed(seed);
    }

    let config = config_builder.build()?;
    let pipeline = CleaningPipeline::new(config);

    match pipeline.run(Path::new(&args.input)) {
        Ok(summary) => handle_output(&summary, &args),
        Err(e) => {
            error!("Cleaning failed: {}", e);
            Err(anyhow!("Cleaning failed: {}", e))
        }
    }
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: print a human-readable summary to stdout
/// - `--json`: print JSON to stdout only (no logs)
/// - `--emit-report`: additionally write the JSON summary to a file
fn handle_output(summary: &RunSummary, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let report_path =
            write_summary_to_file(summary, Path::new(&args.output), &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(summary);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the cleaning run.
///
/// This uses `println!` intentionally for user-facing CLI output; unlike
/// logging it should always be visible regardless of log level.
fn print_human_readable_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Files processed: {}", summary.files_processed);
    println!(
        "Total records processed: {} ({} columns)",
        summary.rows_processed, summary.columns
    );
    println!(
        "Total missing values replaced: {}",
        summary.imputation.total_replaced
    );
    println!(
        "Missing cells: {} -> {}",
        summary.imputation.missing_before, summary.imputation.missing_after
    );

    let filled_columns: Vec<_> = summary
        .imputation
        .columns
        .iter()
        .filter(|c| c.replaced > 0)
        .collect();
    if !filled_columns.is_empty() {
        println!();
        println!("Replacements by column:");
        for fill in filled_columns {
            println!("  {} -> {} values", fill.column, fill.replaced);
        }
    }

    if let Some(ref sorted_by) = summary.sorted_by {
        println!();
        println!("Sorted by: {}", sorted_by);
    }

    if !summary.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
    }

    println!();
    if let Some(ref output_file) = summary.output_file {
        println!("Cleaned file saved to: {}", output_file);
    }
    println!("Duration: {}ms", summary.duration_ms);
    println!("{}", "=".repeat(60));
}
