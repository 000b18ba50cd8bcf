//! Console rendering of the comparison.
//!
//! Colours are set per `comfy_table` cell only, never on the terminal itself.

use comfy_table::{presets, Cell, CellAlignment, Color, Row, Table};
use std::io::{self, Write};
use std::path::Path;

use crate::model::{Competitor, RaceLap, TyreCompound};
use crate::stats::{lap_delta, CompetitorStats, StatsSummary};

/// Display names of the two cars.
#[derive(Debug, Clone)]
pub struct Labels {
    pub driver_a: String,
    pub driver_b: String,
}

impl Labels {
    pub fn name(&self, who: Competitor) -> &str {
        match who {
            Competitor::A => &self.driver_a,
            Competitor::B => &self.driver_b,
        }
    }

    /// Three-letter tag used in the lap table headers, e.g. "GAS".
    pub fn short(&self, who: Competitor) -> String {
        self.name(who).chars().take(3).collect::<String>().to_uppercase()
    }
}

pub struct Report<'a> {
    pub laps: &'a [RaceLap],
    pub summary: &'a StatsSummary,
    pub labels: &'a Labels,
    pub styled: bool,
}

impl<'a> Report<'a> {
    pub fn write_to<W: Write>(&self, out: &mut W, input: &Path, event: &str) -> io::Result<()> {
        writeln!(out, "File: {}", input.display())?;
        writeln!(out, "Laps loaded: {} - {}", self.laps.len(), event)?;
        writeln!(out)?;
        writeln!(out, "{}", self.summary_table())?;

        if let Some(footer) = self.delta_footer() {
            let mut line = self.new_table(presets::NOTHING);
            line.add_row(vec![Cell::new(footer).fg(Color::Cyan)]);
            writeln!(out, "{}", line)?;
        }

        writeln!(out)?;
        writeln!(out, "All race laps (where both drivers have a time):")?;
        writeln!(out, "{}", self.laps_table())
    }

    fn new_table(&self, preset: &str) -> Table {
        let mut table = Table::new();
        table.load_preset(preset);
        if !self.styled {
            table.force_no_tty();
        }
        table
    }

    pub fn summary_table(&self) -> Table {
        let a = self.summary.competitor(Competitor::A);
        let b = self.summary.competitor(Competitor::B);

        let mut table = self.new_table(presets::ASCII_MARKDOWN);
        table.set_header(vec![
            "METRIC",
            self.labels.driver_a.as_str(),
            self.labels.driver_b.as_str(),
        ]);

        // "no fastest lap" only becomes 0 here, for display
        table.add_row(metric_row(
            "Fastest Lap",
            a.fastest_lap.unwrap_or(0.0),
            b.fastest_lap.unwrap_or(0.0),
        ));
        table.add_row(metric_row("Avg Pace", a.average_clean_pace, b.average_clean_pace));
        table.add_row(metric_row("Median Pace", a.median_clean_pace, b.median_clean_pace));
        table.add_row(vec![
            Cell::new("Pitstops"),
            Cell::new(a.pitstop_count),
            Cell::new(b.pitstop_count),
        ]);

        for row in tyre_rows(a, b) {
            table.add_row(row);
        }
        table
    }

    pub fn delta_footer(&self) -> Option<String> {
        let delta = self.summary.average_pace_delta?;
        let winner = self.summary.faster_on_average()?;
        Some(format!(
            "PACE DELTA: {} was faster by {:.3}s per lap (green flags no pitstops).",
            self.labels.name(winner),
            delta.abs()
        ))
    }

    pub fn laps_table(&self) -> Table {
        let (ga, gb) = (self.labels.short(Competitor::A), self.labels.short(Competitor::B));

        let mut table = self.new_table(presets::ASCII_MARKDOWN);
        table.set_header(vec![
            "Lap".to_string(),
            format!("{} Lap (s)", ga),
            format!("{} Lap (s)", gb),
            format!("Delta ({} - {})", ga, gb),
            format!("{} Pos", ga),
            format!("{} Pos", gb),
            format!("{} Status", ga),
            format!("{} Status", gb),
            format!("{} Pit", ga),
            format!("{} Pit", gb),
        ]);

        for lap in self.laps {
            let (Some(delta), Some(ta), Some(tb)) =
                (lap_delta(lap), lap.competitor_a.time, lap.competitor_b.time)
            else {
                continue;
            };
            let (a, b) = (&lap.competitor_a, &lap.competitor_b);

            let mut row = Row::new();
            row.add_cell(Cell::new(lap.lap_number));
            row.add_cell(Cell::new(format!("{:.3}", ta)));
            row.add_cell(Cell::new(format!("{:.3}", tb)));
            row.add_cell(delta_cell(delta));
            for metric in [a, b] {
                row.add_cell(Cell::new(
                    metric.position.map_or_else(|| "--".to_string(), |p| p.to_string()),
                ));
            }
            for metric in [a, b] {
                row.add_cell(Cell::new(metric.track_status().short_label()));
            }
            for metric in [a, b] {
                row.add_cell(Cell::new(if metric.pitstop { "YES" } else { "" }));
            }
            table.add_row(row);
        }

        for idx in 0..10 {
            if let Some(column) = table.column_mut(idx) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table
    }
}

// the smaller positive value gets highlighted
fn metric_row(label: &str, a: f64, b: f64) -> Vec<Cell> {
    vec![
        Cell::new(label),
        pace_cell(a, a < b && a > 0.0),
        pace_cell(b, b < a && b > 0.0),
    ]
}

fn pace_cell(value: f64, best: bool) -> Cell {
    let cell = Cell::new(format!("{:.3}s", value));
    if best {
        cell.fg(Color::Green)
    } else {
        cell
    }
}

fn delta_cell(delta: f64) -> Cell {
    let sign = if delta >= 0.0 { '+' } else { '-' };
    let cell = Cell::new(format!("{}{:.3} s", sign, delta.abs()));
    if delta > 0.0 {
        cell.fg(Color::Green)
    } else if delta < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

// one row per stint, compounds coloured the way the pit wall reads them
fn tyre_rows(a: &CompetitorStats, b: &CompetitorStats) -> Vec<Vec<Cell>> {
    let stints = a.compound_sequence.len().max(b.compound_sequence.len()).max(1);
    (0..stints)
        .map(|i| {
            let label = if i == 0 { "Tyres" } else { "" };
            vec![
                Cell::new(label),
                compound_cell(a.compound_sequence.get(i)),
                compound_cell(b.compound_sequence.get(i)),
            ]
        })
        .collect()
}

fn compound_cell(compound: Option<&String>) -> Cell {
    let Some(compound) = compound else {
        return Cell::new("");
    };
    let cell = Cell::new(compound);
    match TyreCompound::classify(compound) {
        TyreCompound::Soft => cell.fg(Color::Red),
        TyreCompound::Medium => cell.fg(Color::Yellow),
        TyreCompound::Hard => cell.fg(Color::White),
        TyreCompound::Other => cell,
    }
}
