//! Report command for weekly hour totals.
//!
//! This module implements `fh report`: it reads a weekly log, aggregates it
//! and renders the totals (human-readable or JSON), optionally saving the
//! rendering to a file.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use fh_core::{Aggregator, Report, ServiceClass};
use serde::Serialize;

use crate::Config;
use crate::source;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Weekly log file (`-` reads stdin). Defaults to `data_file` from config.
    pub file: Option<PathBuf>,

    /// Custom line pattern with named groups `start`, `end` and `category`.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Also write the report to this file.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ========== Human-readable Output ==========

/// Formats hours with two decimal places.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

const fn section_title(class: ServiceClass) -> &'static str {
    match class {
        ServiceClass::Direct => "DIRECT SERVICES",
        ServiceClass::Indirect => "INDIRECT SERVICES",
    }
}

/// Formats the human-readable report output.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    writeln!(output, "FIELDWORK HOURS").unwrap();

    for class in ServiceClass::ALL {
        let title = section_title(class);
        writeln!(output).unwrap();
        writeln!(output, "{title}").unwrap();
        writeln!(output, "{}", "─".repeat(title.len())).unwrap();

        for (category, hours) in report.categories(class) {
            writeln!(output, "  {category:<16}{:>8} h", format_hours(hours)).unwrap();
        }
        writeln!(
            output,
            "  {:<16}{:>8} h",
            "Subtotal",
            format_hours(report.total(class))
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "{:<18}{:>8} h",
        "Direct hours:",
        format_hours(report.total(ServiceClass::Direct))
    )
    .unwrap();
    writeln!(
        output,
        "{:<18}{:>8} h",
        "Indirect hours:",
        format_hours(report.total(ServiceClass::Indirect))
    )
    .unwrap();
    writeln!(
        output,
        "{:<18}{:>8} h",
        "Total hours:",
        format_hours(report.grand_total())
    )
    .unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub report: &'a Report,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub direct: f64,
    pub indirect: f64,
    pub total: f64,
}

/// Formats report data as JSON.
pub fn format_report_json(report: &Report) -> Result<String> {
    let json = JsonReport {
        report,
        totals: JsonTotals {
            direct: report.total(ServiceClass::Direct),
            indirect: report.total(ServiceClass::Indirect),
            total: report.grand_total(),
        },
    };

    let mut output = serde_json::to_string_pretty(&json)?;
    output.push('\n');
    Ok(output)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let Some(path) = args.file.as_ref().or(config.data_file.as_ref()) else {
        bail!("no log file given; pass FILE or set data_file in the config");
    };

    let parser = config
        .line_parser(args.pattern.as_deref())
        .context("invalid line pattern")?;
    let lines = source::read_lines(path)?;
    tracing::debug!(path = %path.display(), lines = lines.len(), "read log");

    let report = Aggregator::new(parser)
        .aggregate(&lines)
        .with_context(|| format!("failed to process {}", path.display()))?;

    let output = if args.json {
        format_report_json(&report)?
    } else {
        format_report(&report)
    };
    write!(writer, "{output}")?;

    if let Some(save_path) = args.save.as_ref().or(config.save_path.as_ref()) {
        std::fs::write(save_path, &output)
            .with_context(|| format!("failed to write report to {}", save_path.display()))?;
        tracing::info!(path = %save_path.display(), "saved report");
    }

    Ok(())
}
