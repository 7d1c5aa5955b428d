use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relcheck_core::{
    Config, ConformanceClass, ContainerInfo, Location, NotApplicablePolicy, Report, Severity,
};
use relcheck_catalog::{SchemaCatalog, SqliteContainer};
use relcheck_engine::{Applicability, ConformanceChecker};

/// relcheck - GeoPackage Related Tables conformance checker
#[derive(Parser)]
#[command(name = "relcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: relcheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a GeoPackage against the Related Tables conformance classes
    Check {
        /// GeoPackage file to check
        file: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,

        /// Conformance class to check (repeatable; overrides config)
        #[arg(long = "class", value_parser = parse_class)]
        classes: Vec<ConformanceClass>,

        /// Fail classes the GeoPackage does not use instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Skip the per-row geometry check for related feature tables
        #[arg(long)]
        no_geometry_values: bool,
    },

    /// Show which conformance classes a GeoPackage uses
    Applicability {
        /// GeoPackage file to inspect
        file: PathBuf,
    },

    /// Show the column metadata of one table
    Inspect {
        /// GeoPackage file to inspect
        file: PathBuf,

        /// Table name
        table: String,
    },
}

fn parse_class(value: &str) -> std::result::Result<ConformanceClass, String> {
    ConformanceClass::from_relation_name(value).ok_or_else(|| {
        format!("unknown conformance class '{}' (expected features, media or simple_attributes)", value)
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("relcheck.toml").exists() {
        Config::from_file(Path::new("relcheck.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    tracing::debug!(classes = ?config.classes, policy = ?config.not_applicable, "loaded configuration");

    match cli.command {
        Commands::Check { file, output, markdown, classes, strict, no_geometry_values } => {
            let mut config = config;
            if !classes.is_empty() {
                config.classes = classes;
            }
            if strict {
                config.not_applicable = NotApplicablePolicy::Fail;
            }
            if no_geometry_values {
                config.check_geometry_values = false;
            }
            check_command(&config, &file, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Applicability { file } => applicability_command(&config, &file),
        Commands::Inspect { file, table } => inspect_command(&file, &table),
    }
}

fn open_container(file: &Path) -> Result<SqliteContainer> {
    SqliteContainer::open(file).with_context(|| format!("Failed to open {}", file.display()))
}

/// Check command - run every configured conformance class
fn check_command(
    config: &Config,
    file: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let container = open_container(file)?;
    let info = ContainerInfo::from_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if verbose {
        eprintln!("{} {} (sha256 {})", "Checking".cyan(), info.path, info.sha256);
    }

    let checker = ConformanceChecker::new(&container)
        .with_geometry_values(config.check_geometry_values);

    let mut report = Report::new().with_container(info);

    for &class in &config.classes {
        if verbose {
            eprintln!("  {} {}...", "Running".cyan(), class.display_name());
        }

        let outcome = checker
            .run(class, config.not_applicable)
            .with_context(|| format!("Failed to read the container while checking {}", class))?;

        report.add_tables_validated(outcome.tables_validated());
        report.add_diagnostic(outcome.to_diagnostic(class));
    }

    // Save JSON report
    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    // Save markdown report if requested
    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if any class failed
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Applicability command - report which classes are in use
fn applicability_command(config: &Config, file: &Path) -> Result<()> {
    let container = open_container(file)?;
    let checker = ConformanceChecker::new(&container);

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Related Tables Applicability".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for &class in &config.classes {
        println!("{}", class.display_name().bold());
        match checker.applicability(class)? {
            Applicability::Applicable { tables } => {
                println!("  {} {}", "active".green().bold(), tables.join(", "));
            }
            Applicability::NotApplicable { reason } => {
                println!("  {} {}", "inactive".yellow(), reason);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

/// Inspect command - print column metadata with resolved affinities
fn inspect_command(file: &Path, table: &str) -> Result<()> {
    let container = open_container(file)?;
    let catalog = SchemaCatalog::new(&container);

    if !catalog.table_exists(table)? {
        return Err(anyhow::anyhow!("Table '{}' does not exist in {}", table, file.display()));
    }

    let schema = catalog.columns(table)?;

    println!("{} {}", "Table:".bold(), schema.table.green());
    println!();
    println!(
        "  {:<24} {:<16} {:<8} {:<8} {:<4} {}",
        "column", "type", "affinity", "notnull", "pk", "default"
    );
    for column in &schema.columns {
        println!(
            "  {:<24} {:<16} {:<8} {:<8} {:<4} {}",
            column.name,
            column.declared_type,
            column.affinity().as_str(),
            if column.not_null { "yes" } else { "no" },
            if column.is_primary_key { "yes" } else { "no" },
            column.default_value.as_deref().unwrap_or("-"),
        );
    }

    let geometry = catalog.geometry_columns(table)?;
    if !geometry.is_empty() {
        println!();
        println!("{}", "Registered geometry columns:".bold());
        for column in geometry {
            println!("  - {} ({})", column.column_name, column.geometry_type_name);
        }
    }

    Ok(())
}

fn format_location(location: &Location) -> String {
    match &location.column {
        Some(column) => format!("{}.{}", location.table, column),
        None => location.table.clone(),
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Related Tables Conformance Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    if let Some(container) = &report.container {
        println!("Container: {}", container.path);
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Classes checked:  {}", report.summary.classes_checked);
    println!("  Passed:           {}", report.summary.passed.to_string().green());
    println!("  Skipped:          {}", report.summary.skipped.to_string().yellow());

    if report.summary.failed > 0 {
        println!("  Failed:           {}", report.summary.failed.to_string().red().bold());
    } else {
        println!("  Failed:           {}", report.summary.failed.to_string().green());
    }

    println!("  Tables validated: {}", report.summary.tables_validated);
    println!();

    for diag in &report.diagnostics {
        let status = match (diag.severity, diag.code) {
            (Severity::Error, _) => "FAIL".red().bold(),
            (Severity::Info, relcheck_core::DiagnosticCode::ClassPassed) => "PASS".green().bold(),
            (Severity::Info, _) => "SKIP".yellow(),
        };

        println!("  [{}] {}: {}", status, diag.code, diag.message);

        if let Some(location) = &diag.location {
            println!("    at {}", format_location(location));
        }

        if let Some(exp) = &diag.expected {
            println!("    Expected: {}", exp);
        }
        if let Some(act) = &diag.actual {
            println!("    Actual:   {}", act);
        }
    }

    println!();
    if report.has_errors() {
        println!("{}", "✗ GeoPackage does not conform".red().bold());
    } else {
        println!("{}", "✓ All checked classes conform".green().bold());
    }
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Related Tables Conformance Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    if let Some(container) = &report.container {
        md.push_str(&format!("**Container:** `{}` (sha256 `{}`)\n\n", container.path, container.sha256));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Classes checked: {}\n", report.summary.classes_checked));
    md.push_str(&format!("- Passed: {}\n", report.summary.passed));
    md.push_str(&format!("- Skipped: {}\n", report.summary.skipped));
    md.push_str(&format!("- Failed: {}\n", report.summary.failed));
    md.push_str(&format!("- Tables validated: {}\n", report.summary.tables_validated));
    md.push('\n');

    md.push_str("## Classes\n\n");
    for diag in &report.diagnostics {
        let marker = match (diag.severity, diag.code) {
            (Severity::Error, _) => "❌",
            (Severity::Info, relcheck_core::DiagnosticCode::ClassPassed) => "✅",
            (Severity::Info, _) => "⏭️",
        };

        md.push_str(&format!("### {} {} - {}\n\n", marker, diag.class.display_name(), diag.code));
        md.push_str(&format!("{}\n\n", diag.message));

        if let Some(location) = &diag.location {
            md.push_str(&format!("**Location:** `{}`\n\n", format_location(location)));
        }

        if let Some(exp) = &diag.expected {
            md.push_str(&format!("**Expected:** `{}`\n\n", exp));
        }
        if let Some(act) = &diag.actual {
            md.push_str(&format!("**Actual:** `{}`\n\n", act));
        }
    }

    md
}
