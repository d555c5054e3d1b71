//! CSV ingest for daily series.
//!
//! Expected layout: a header row, a date (or datetime) in the first column,
//! numeric fields in the remaining columns. The household power dataset
//! resampled to days looks like:
//!
//! ```text
//! datetime,Global_active_power,Global_reactive_power,Voltage,...
//! 2006-12-16,1209.176,34.922,93552.53,...
//! ```
//!
//! Unlike a cross-sectional file we cannot skip bad rows: dropping a day
//! would shift every later week. Any unparseable row fails the load and the
//! first few problems are reported with their line numbers.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Observation, Series};
use crate::error::AppError;

/// How many row errors are quoted in the failure message.
const MAX_REPORTED_ROW_ERRORS: usize = 5;

/// Summary stats about the loaded series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub n_rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub target_min: f64,
    pub target_max: f64,
    /// Consecutive rows whose dates are not exactly one day apart.
    pub gaps: usize,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the series plus summary stats.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: Series,
    pub stats: SeriesStats,
}

/// Load a daily series from `path`.
///
/// `target` names the target column (case-insensitive); `None` selects the
/// first numeric column.
pub fn load_series(path: &Path, target: Option<&str>) -> Result<IngestedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.len() < 2 {
        return Err(AppError::new(
            2,
            "CSV needs a date column followed by at least one numeric column.",
        ));
    }

    let columns: Vec<String> = headers
        .iter()
        .skip(1)
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    let target_idx = resolve_target(&columns, target)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = idx + 2;
        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, columns.len()));

        match parsed {
            Ok(obs) => rows.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        let shown: Vec<String> = row_errors
            .iter()
            .take(MAX_REPORTED_ROW_ERRORS)
            .map(|e| format!("line {}: {}", e.line, e.message))
            .collect();
        return Err(AppError::new(
            3,
            format!(
                "{} invalid row(s) in '{}':\n  {}",
                row_errors.len(),
                path.display(),
                shown.join("\n  ")
            ),
        ));
    }

    let series = Series {
        columns,
        target: target_idx,
        rows,
    };
    let stats = compute_stats(&series).ok_or_else(|| AppError::new(3, "CSV contains no data rows."))?;

    if stats.gaps > 0 {
        warn!(gaps = stats.gaps, "series dates are not consecutive days; weeks may be misaligned");
    }
    info!(
        rows = stats.n_rows,
        target = series.target_name(),
        first = %stats.first_date,
        last = %stats.last_date,
        "loaded series"
    );

    Ok(IngestedSeries { series, stats })
}

fn resolve_target(columns: &[String], target: Option<&str>) -> Result<usize, AppError> {
    let Some(name) = target else {
        return Ok(0);
    };

    let lookup: HashMap<String, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.to_ascii_lowercase(), i))
        .collect();

    lookup
        .get(&name.trim().to_ascii_lowercase())
        .copied()
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Target column `{name}` not found. Available: {}", columns.join(", ")),
            )
        })
}

fn parse_row(record: &StringRecord, width: usize) -> Result<Observation, String> {
    if record.len() != width + 1 {
        return Err(format!("expected {} fields, found {}", width + 1, record.len()));
    }

    let date = parse_date(record.get(0).unwrap_or(""))?;
    let values = record
        .iter()
        .skip(1)
        .map(parse_value)
        .collect::<Result<Vec<f64>, String>>()?;

    Ok(Observation { date, values })
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Resampled exports carry a midnight timestamp; plain dates are accepted too.
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

fn parse_value(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value '{s}'."))
    }
}

fn compute_stats(series: &Series) -> Option<SeriesStats> {
    let first = series.rows.first()?;
    let last = series.rows.last()?;

    let mut target_min = f64::INFINITY;
    let mut target_max = f64::NEG_INFINITY;
    for v in series.target_values() {
        target_min = target_min.min(v);
        target_max = target_max.max(v);
    }

    let gaps = series
        .rows
        .windows(2)
        .filter(|w| (w[1].date - w[0].date).num_days() != 1)
        .count();

    Some(SeriesStats {
        n_rows: series.len(),
        first_date: first.date,
        last_date: last.date,
        target_min,
        target_max,
        gaps,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_datetime_column_and_defaults_to_first_field() {
        let file = write_csv(
            "datetime,Global_active_power,Voltage\n\
             2006-12-16 00:00:00,1209.176,93552.53\n\
             2006-12-17 00:00:00,3390.46,345725.32\n",
        );

        let ingested = load_series(file.path(), None).unwrap();
        let series = &ingested.series;
        assert_eq!(series.columns, vec!["Global_active_power", "Voltage"]);
        assert_eq!(series.target, 0);
        assert_eq!(series.rows[1].date, NaiveDate::from_ymd_opt(2006, 12, 17).unwrap());
        assert_eq!(series.target_values(), vec![1209.176, 3390.46]);
        assert_eq!(ingested.stats.gaps, 0);
    }

    #[test]
    fn target_is_matched_case_insensitively() {
        let file = write_csv("date,a,b\n2007-01-01,1,10\n2007-01-02,2,20\n");
        let ingested = load_series(file.path(), Some("B")).unwrap();
        assert_eq!(ingested.series.target, 1);
        assert_eq!(ingested.stats.target_max, 20.0);
    }

    #[test]
    fn unknown_target_is_exit_code_two() {
        let file = write_csv("date,a\n2007-01-01,1\n");
        let err = load_series(file.path(), Some("missing")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_rows_fail_with_line_numbers() {
        let file = write_csv("date,a\n2007-01-01,1\n2007-01-02,oops\nnot-a-date,3\n");
        let err = load_series(file.path(), None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let msg = err.to_string();
        assert!(msg.contains("2 invalid row(s)"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("line 4"));
    }

    #[test]
    fn date_gaps_are_counted() {
        let file = write_csv("date,a\n2007-01-01,1\n2007-01-02,2\n2007-01-05,3\n");
        let ingested = load_series(file.path(), None).unwrap();
        assert_eq!(ingested.stats.gaps, 1);
    }
}
