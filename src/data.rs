use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::error::RaceDataError;
use crate::model::{LapMetric, RaceLap};

// where each value lives in a telemetry row. The export keeps unused columns
// between these, so the positions are sparse and must not be compacted.
#[derive(Debug, Clone, Copy)]
pub struct CompetitorColumns {
    pub time: usize,
    pub position: usize,
    pub tyre_compound: usize,
    pub pitstop: usize,
    pub status: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub lap_number: usize,
    pub competitor_a: CompetitorColumns,
    pub competitor_b: CompetitorColumns,
}

pub const COLUMNS: ColumnMap = ColumnMap {
    lap_number: 0,
    competitor_a: CompetitorColumns {
        time: 1,
        position: 3,
        tyre_compound: 5,
        pitstop: 7,
        status: 13,
    },
    competitor_b: CompetitorColumns {
        time: 15,
        position: 17,
        tyre_compound: 19,
        pitstop: 21,
        status: 27,
    },
};

/// Number of fields a data row must have to reach the last mapped column.
pub const MIN_ROW_WIDTH: usize = COLUMNS.competitor_b.status + 1;

/// Reads the whole export and parses it. A missing file is reported as
/// `RaceDataError::FileNotFound` so the caller can show "no data" instead of failing.
pub fn load_race<P: AsRef<Path>>(path: P) -> Result<Vec<RaceLap>, RaceDataError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => RaceDataError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => RaceDataError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let laps = parse_race_laps(&text)?;
    tracing::info!("loaded {} laps from {}", laps.len(), path.display());
    Ok(laps)
}

/// Turns the raw file text into laps, keeping file order. Rows whose first
/// character is not a digit are headers or metadata and are skipped. Any
/// malformed data row aborts the whole parse.
pub fn parse_race_laps(text: &str) -> Result<Vec<RaceLap>, RaceDataError> {
    // plain comma split: no header row, rows of any width, and quotes are just characters
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut laps = Vec::new();
    for res in reader.records() {
        let record = res?;
        let line = record.position().map_or(0, |p| p.line());

        // headers and metadata never start with a lap number
        if !starts_with_digit(&record) {
            tracing::debug!("skipping metadata row at line {}", line);
            continue;
        }
        laps.push(parse_row(&record, line)?);
    }
    Ok(laps)
}

fn starts_with_digit(record: &StringRecord) -> bool {
    record
        .get(0)
        .and_then(|f| f.chars().next())
        .map_or(false, |c| c.is_ascii_digit())
}

fn parse_row(record: &StringRecord, line: u64) -> Result<RaceLap, RaceDataError> {
    // the lap number is required, a bad one fails the whole file
    let raw_lap = field(record, COLUMNS.lap_number, "lap number", line)?;
    let lap_number = raw_lap
        .trim()
        .parse::<u32>()
        .map_err(|_| RaceDataError::parse(line, "lap number", raw_lap))?;

    // both cars share the same layout, only the column offsets differ
    Ok(RaceLap {
        lap_number,
        competitor_a: parse_metric(record, &COLUMNS.competitor_a, line)?,
        competitor_b: parse_metric(record, &COLUMNS.competitor_b, line)?,
    })
}

fn parse_metric(
    record: &StringRecord,
    cols: &CompetitorColumns,
    line: u64,
) -> Result<LapMetric, RaceDataError> {
    // times always use '.' as the decimal separator
    let time = parse_optional::<f64>(field(record, cols.time, "time", line)?, "time", line)?;
    if let Some(t) = time {
        if !t.is_finite() {
            return Err(RaceDataError::parse(line, "time", t.to_string()));
        }
    }

    // tyre compound is taken as-is, blanks included
    Ok(LapMetric {
        time,
        position: parse_optional(field(record, cols.position, "position", line)?, "position", line)?,
        tyre_compound: field(record, cols.tyre_compound, "tyre compound", line)?.to_string(),
        pitstop: parse_pitstop(field(record, cols.pitstop, "pitstop", line)?),
        status: parse_optional(field(record, cols.status, "status", line)?, "status", line)?,
    })
}

fn field<'r>(
    record: &'r StringRecord,
    column: usize,
    name: &'static str,
    line: u64,
) -> Result<&'r str, RaceDataError> {
    record.get(column).ok_or(RaceDataError::MissingField {
        line,
        column,
        field: name,
    })
}

// empty cell -> None. Anything else has to parse, surrounding spaces allowed.
fn parse_optional<T: FromStr>(
    raw: &str,
    name: &'static str,
    line: u64,
) -> Result<Option<T>, RaceDataError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| RaceDataError::parse(line, name, raw))
}

// only "TRUE" (any case) counts, everything else is false
fn parse_pitstop(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("TRUE")
}

#[cfg(test)]
mod tests {
    use super::*;

    // builds a full-width row and fills the mapped columns
    fn row(lap: &str, a: [&str; 5], b: [&str; 5]) -> String {
        let mut cells = vec![String::new(); MIN_ROW_WIDTH];
        cells[COLUMNS.lap_number] = lap.to_string();
        for (cols, vals) in [(COLUMNS.competitor_a, a), (COLUMNS.competitor_b, b)] {
            cells[cols.time] = vals[0].to_string();
            cells[cols.position] = vals[1].to_string();
            cells[cols.tyre_compound] = vals[2].to_string();
            cells[cols.pitstop] = vals[3].to_string();
            cells[cols.status] = vals[4].to_string();
        }
        cells.join(",")
    }

    #[test]
    fn parses_mapped_columns() {
        let text = row(
            "12",
            ["90.123", "10", "SOFT", "FALSE", "1"],
            ["91.5", "11", "MEDIUM", "true", "2"],
        );
        let laps = parse_race_laps(&text).unwrap();
        assert_eq!(laps.len(), 1);

        let lap = &laps[0];
        assert_eq!(lap.lap_number, 12);
        assert_eq!(lap.competitor_a.time, Some(90.123));
        assert_eq!(lap.competitor_a.position, Some(10));
        assert_eq!(lap.competitor_a.tyre_compound, "SOFT");
        assert!(!lap.competitor_a.pitstop);
        assert_eq!(lap.competitor_a.status, Some(1));
        assert_eq!(lap.competitor_b.time, Some(91.5));
        assert!(lap.competitor_b.pitstop);
        assert_eq!(lap.competitor_b.status, Some(2));
    }

    #[test]
    fn blank_cells_are_absent_not_zero() {
        let text = row("3", ["", "", "", "", ""], ["0", "", "", "", ""]);
        let lap = &parse_race_laps(&text).unwrap()[0];
        assert_eq!(lap.competitor_a, LapMetric::default());
        assert_eq!(lap.competitor_b.time, Some(0.0));
        assert_eq!(lap.competitor_b.position, None);
    }

    #[test]
    fn skips_headers_blank_and_metadata_lines() {
        let text = format!(
            "Lap,GAS time,...\n\n   \n# exported\n{}\n,{}\n{}\n",
            row("1", ["90", "", "", "", ""], ["91", "", "", "", ""]),
            "orphan",
            row("2", ["89", "", "", "", ""], ["90", "", "", "", ""]),
        );
        let laps = parse_race_laps(&text).unwrap();
        let numbers: Vec<u32> = laps.iter().map(|l| l.lap_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn keeps_file_order_and_duplicate_lap_numbers() {
        let empty = ["", "", "", "", ""];
        let text = [row("5", empty, empty), row("2", empty, empty), row("5", empty, empty)].join("\n");
        let numbers: Vec<u32> = parse_race_laps(&text)
            .unwrap()
            .iter()
            .map(|l| l.lap_number)
            .collect();
        assert_eq!(numbers, vec![5, 2, 5]);
    }

    #[test]
    fn pitstop_is_lenient() {
        assert!(parse_pitstop("TRUE"));
        assert!(parse_pitstop("True"));
        assert!(!parse_pitstop("FALSE"));
        assert!(!parse_pitstop(""));
        assert!(!parse_pitstop("yes"));
        assert!(!parse_pitstop(" TRUE"));
    }

    #[test]
    fn tyre_compound_is_kept_verbatim() {
        let text = row("1", ["", "", " soft ", "", ""], ["", "", "", "", ""]);
        let lap = &parse_race_laps(&text).unwrap()[0];
        assert_eq!(lap.competitor_a.tyre_compound, " soft ");
        assert_eq!(lap.competitor_b.tyre_compound, "");
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        let text = row("1", ["", "", "\"SOFT\"", "", ""], ["", "", "HARD", "", ""]);
        let lap = &parse_race_laps(&text).unwrap()[0];
        assert_eq!(lap.competitor_a.tyre_compound, "\"SOFT\"");
        assert_eq!(lap.competitor_b.tyre_compound, "HARD");
    }

    #[test]
    fn quoted_lap_number_is_not_a_data_row() {
        let empty = ["", "", "", "", ""];
        let text = row("\"3\"", empty, empty);
        assert!(parse_race_laps(&text).unwrap().is_empty());
    }

    #[test]
    fn unclosed_quote_in_metadata_does_not_hide_later_rows() {
        let empty = ["", "", "", "", ""];
        let text = format!(
            "\"Exported by tool, v2\n{}\n{}\n",
            row("1", ["90.5", "", "", "", "1"], empty),
            row("2", ["91.0", "", "", "", "1"], empty),
        );
        let laps = parse_race_laps(&text).unwrap();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[1].competitor_a.time, Some(91.0));
    }

    #[test]
    fn crlf_export_with_blank_line_between_rows() {
        let text = format!(
            "Lap,GAS time\r\n{}\r\n\r\n{}\r\n",
            row("1", ["90.5", "", "SOFT", "", "1"], ["91.5", "", "SOFT", "", "2"]),
            row("2", ["90.9", "", "SOFT", "", "4"], ["91.0", "", "HARD", "", "1"]),
        );
        let laps = parse_race_laps(&text).unwrap();
        let numbers: Vec<u32> = laps.iter().map(|l| l.lap_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        // the status sits in the last column, so it must not pick up the '\r'
        assert_eq!(laps[0].competitor_b.status, Some(2));
        assert_eq!(laps[1].competitor_b.status, Some(1));
        assert_eq!(laps[1].competitor_a.status, Some(4));
        assert_eq!(laps[1].competitor_b.tyre_compound, "HARD");
    }

    #[test]
    fn time_uses_dot_decimal_separator() {
        let text = row("1", ["1:30.5", "", "", "", ""], ["", "", "", "", ""]);
        let err = parse_race_laps(&text).unwrap_err();
        assert!(matches!(err, RaceDataError::Parse { field: "time", .. }));
    }

    #[test]
    fn non_finite_time_is_rejected() {
        let text = row("1", ["NaN", "", "", "", ""], ["", "", "", "", ""]);
        assert!(matches!(
            parse_race_laps(&text),
            Err(RaceDataError::Parse { field: "time", .. })
        ));
    }

    #[test]
    fn malformed_position_aborts_parse() {
        let good = row("1", ["90", "1", "", "", ""], ["91", "2", "", "", ""]);
        let bad = row("2", ["90", "P1", "", "", ""], ["91", "2", "", "", ""]);
        let err = parse_race_laps(&format!("{}\n{}", good, bad)).unwrap_err();
        match err {
            RaceDataError::Parse { line, field, value } => {
                assert_eq!(line, 2);
                assert_eq!(field, "position");
                assert_eq!(value, "P1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_lap_number_aborts_parse() {
        let empty = ["", "", "", "", ""];
        let text = format!("{}\n{}", row("1", empty, empty), row("1a", empty, empty));
        assert!(matches!(
            parse_race_laps(&text),
            Err(RaceDataError::Parse { field: "lap number", .. })
        ));
    }

    #[test]
    fn short_row_reports_missing_column() {
        let err = parse_race_laps("4,90.1,,1").unwrap_err();
        assert!(matches!(
            err,
            RaceDataError::MissingField { line: 1, column: 5, .. }
        ));
    }

    #[test]
    fn numeric_cells_tolerate_surrounding_spaces() {
        let text = row(" 7", [" 90.5 ", " 3", "", "", " 1 "], ["", "", "", "", ""]);
        // first char is a space, so this is treated as metadata
        assert!(parse_race_laps(&text).unwrap().is_empty());

        let text = row("7 ", [" 90.5 ", " 3", "", "", " 1 "], ["", "", "", "", ""]);
        let lap = &parse_race_laps(&text).unwrap()[0];
        assert_eq!(lap.lap_number, 7);
        assert_eq!(lap.competitor_a.time, Some(90.5));
        assert_eq!(lap.competitor_a.position, Some(3));
        assert_eq!(lap.competitor_a.status, Some(1));
    }

    #[test]
    fn parsing_is_repeatable() {
        let text = [
            row("1", ["90.1", "4", "SOFT", "", "1"], ["91.2", "5", "HARD", "", "1"]),
            row("2", ["", "4", "SOFT", "TRUE", "4"], ["92.0", "", "HARD", "", "4"]),
        ]
        .join("\n");
        assert_eq!(parse_race_laps(&text).unwrap(), parse_race_laps(&text).unwrap());
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = load_race("definitely/not/here/race.csv").unwrap_err();
        assert!(err.is_file_not_found());
    }
}
