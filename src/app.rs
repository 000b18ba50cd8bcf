use anyhow::Context;
use serde::Serialize;
use std::io::Write;

use crate::config::Cli;
use crate::data::load_race;
use crate::model::RaceLap;
use crate::report::Report;
use crate::stats::StatsSummary;

pub const NO_DATA: &str = "No valid data found to analyze.";

// what --json writes: the parsed laps plus the computed summary, unformatted
#[derive(Serialize)]
struct JsonReport<'a> {
    laps: &'a [RaceLap],
    summary: &'a StatsSummary,
}

/// Load, analyse and write the report for one export.
/// A missing file or an export without data rows is not an error: the user gets
/// a "no data" message and the run still succeeds. Malformed rows and IO
/// failures are returned as errors.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    if !cli.json {
        writeln!(out, "Lap Time Analyzer")?;
        writeln!(out, "=================")?;
    }

    // a missing file ends up in the same place as an empty one
    let laps = match load_race(&cli.input) {
        Ok(laps) => laps,
        Err(e) if e.is_file_not_found() => {
            tracing::warn!("input {} does not exist", cli.input.display());
            writeln!(out, "Error: {}", e)?;
            Vec::new()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("could not analyse {}", cli.input.display()))
        }
    };

    if laps.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
        return Ok(());
    }

    let summary = StatsSummary::compute(&laps);

    // raw numbers for other tools, no rounding or colours
    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &JsonReport { laps: &laps, summary: &summary })?;
        writeln!(out)?;
        return Ok(());
    }

    let labels = cli.labels();
    let report = Report {
        laps: &laps,
        summary: &summary,
        labels: &labels,
        styled: !cli.no_color,
    };
    report.write_to(out, &cli.input, &cli.event)?;
    Ok(())
}
