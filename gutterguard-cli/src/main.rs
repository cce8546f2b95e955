//! GutterGuard CLI - gutter and wireway sizing from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use gutterguard::{
    builtin_tables, load_entries_file, ConductorEntry, EntryInput, ReferenceTables, SizingEngine,
    SizingError, SizingOptions, SizingResult,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "gutterguard")]
#[command(about = "Gutter and wireway sizing from conductor fill and bending space", long_about = None)]
#[command(version)]
struct Cli {
    /// Log sizing details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a gutter size for a list of conductors
    Size {
        /// Conductors as SIZE[:QTY], e.g. 4/0:3 or 250kcmil:6 (QTY defaults to 1)
        #[arg(value_name = "SIZE[:QTY]")]
        entries: Vec<String>,

        /// Read more conductors from a .csv, .txt or .json file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Replacement reference table (JSON)
        #[arg(long, value_name = "FILE")]
        tables: Option<PathBuf>,

        /// Sizing options file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if no standard size fits
        #[arg(long)]
        fail_on_custom: bool,
    },

    /// Show the conductor area and bending space reference table
    Table {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Replacement reference table (JSON)
        #[arg(long, value_name = "FILE")]
        tables: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Size {
            entries,
            file,
            tables,
            config,
            format,
            fail_on_custom,
        } => handle_size(
            &entries,
            file.as_deref(),
            tables,
            config.as_deref(),
            &format,
            fail_on_custom,
        ),
        Commands::Table { format, tables } => handle_table(tables.as_deref(), &format).map(|_| 0),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `SIZE[:QTY]`; a bare size counts as one conductor.
fn parse_entry_arg(arg: &str) -> EntryInput {
    match arg.split_once(':') {
        Some((size, qty)) => EntryInput::new(size, qty),
        None => EntryInput::new(arg, "1"),
    }
}

fn load_tables(path: Option<&Path>) -> Result<Option<ReferenceTables>, SizingError> {
    path.map(ReferenceTables::from_file).transpose()
}

fn handle_size(
    args: &[String],
    file: Option<&Path>,
    tables: Option<PathBuf>,
    config: Option<&Path>,
    format: &OutputFormat,
    fail_on_custom: bool,
) -> Result<i32, SizingError> {
    let mut options = match config {
        Some(path) => SizingOptions::from_file(path)?,
        None => SizingOptions::default(),
    };
    if tables.is_some() {
        options.tables = tables;
    }

    let loaded = options.load_tables()?;
    let tables = match &loaded {
        Some(t) => t,
        None => builtin_tables()?,
    };
    let engine = SizingEngine::with_options(tables, &options)?;

    let mut rows: Vec<EntryInput> = args.iter().map(|a| parse_entry_arg(a)).collect();
    if let Some(path) = file {
        rows.extend(load_entries_file(path)?);
    }

    let entries = rows
        .iter()
        .map(EntryInput::resolve)
        .collect::<Result<Vec<_>, _>>()?;
    let result = engine.compute(&entries)?;

    match format {
        OutputFormat::Human => output_human(&engine, &entries, &result),
        OutputFormat::Json => output_json(&engine, &entries, &result)?,
    }

    if fail_on_custom && result.requires_custom_size {
        return Ok(1);
    }
    Ok(0)
}

fn output_human(engine: &SizingEngine<'_>, entries: &[ConductorEntry], result: &SizingResult) {
    println!("\nReference table: {}", engine.tables().edition());
    println!("{}", "─".repeat(60));

    if entries.is_empty() {
        println!("  No conductors entered");
    } else {
        println!("  Conductors:");
        for entry in entries {
            println!("    {} x {}", entry.quantity, entry.size.label());
        }
    }

    let fill_percent = format_percent(engine.fill_ratio());
    println!();
    println!("  Total Conductor Area: {:.4} sq in", result.total_area);
    println!(
        "  Minimum Cross-Sectional Area ({}% fill): {:.2} sq in",
        fill_percent, result.min_cross_section
    );
    println!("  Minimum Bending Space: {} inches", result.min_bending_space);
    println!();

    match result.recommended_label() {
        Some(label) => println!("  {} minimum gutter size recommended", label),
        None => {
            let largest = engine.standard_sizes().last().copied().unwrap_or_default();
            println!("  >{}\" custom size required", largest);
            println!(
                "  Warning: a {}\" side is needed; no standard gutter size is large enough.",
                result.min_required_side
            );
        }
    }
}

/// Ratio as a percentage, rounded to two decimals with trailing zeros dropped.
fn format_percent(ratio: f64) -> String {
    let percent = (ratio * 10_000.0).round() / 100.0;
    format!("{}", percent)
}

fn output_json(
    engine: &SizingEngine<'_>,
    entries: &[ConductorEntry],
    result: &SizingResult,
) -> Result<(), SizingError> {
    let output = serde_json::json!({
        "edition": engine.tables().edition(),
        "fill_ratio": engine.fill_ratio(),
        "standard_sizes": engine.standard_sizes(),
        "entries": entries,
        "result": result,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_table(path: Option<&Path>, format: &OutputFormat) -> Result<(), SizingError> {
    let loaded = load_tables(path)?;
    let tables = match &loaded {
        Some(t) => t,
        None => builtin_tables()?,
    };

    match format {
        OutputFormat::Human => {
            println!("Reference table: {}", tables.edition());
            if !tables.area_reference().is_empty() {
                println!("  Area:          {}", tables.area_reference());
            }
            if !tables.bending_reference().is_empty() {
                println!("  Bending space: {}", tables.bending_reference());
            }
            println!();
            println!("  {:<12} {:>14} {:>20}", "Size", "Area (sq in)", "Bending space (in)");
            println!("  {}", "─".repeat(48));
            for (size, spec) in tables.iter() {
                println!(
                    "  {:<12} {:>14.4} {:>20}",
                    size.label(),
                    spec.area_sq_in,
                    spec.bending_space_in
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(tables)?);
        }
    }
    Ok(())
}
