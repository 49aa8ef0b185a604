use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::Observation;

/// Date format of the delimited export (`2023-01-31`).
const CSV_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format of the JSON record export (`31-01-2023`).
const JSON_DATE_FORMAT: &str = "%d-%m-%Y";
/// Value field name in the JSON record export.
const JSON_VALUE_FIELD: &str = "CPI";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Parse result
// ---------------------------------------------------------------------------

/// Observations in source order plus the number of rows dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub observations: Vec<Observation>,
    pub skipped: usize,
}

impl Parsed {
    fn push_row(&mut self, row: usize, date: Option<&str>, value: Option<&str>, date_format: &str) {
        match parse_row(date, value, date_format) {
            Some(obs) => self.observations.push(obs),
            None => {
                debug!("skipping row {row}: date={date:?} value={value:?}");
                self.skipped += 1;
            }
        }
    }

    fn skip(&mut self, row: usize, reason: &str) {
        debug!("skipping row {row}: {reason}");
        self.skipped += 1;
    }

    fn report(self, source: &str) -> Self {
        if self.skipped > 0 {
            warn!(
                "{source}: skipped {} malformed row(s), kept {}",
                self.skipped,
                self.observations.len()
            );
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load observations from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, then `date,<unused>,cpi`
/// * `.json` – `[{ "date": "dd-MM-yyyy", "CPI": "<number>" }, ...]`
pub fn load_file(path: &Path) -> Result<Parsed, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let read = || {
        std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
    };

    let parsed = match ext.as_str() {
        "csv" => parse_csv(read()?),
        "json" => parse_json_slice(&read()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    info!(
        "loaded {} observation(s) from {}",
        parsed.observations.len(),
        path.display()
    );
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// CSV layout: header row, then `date,<unused>,cpi`.
///
/// The date and value columns are found by header name (`date`, `cpi`),
/// falling back to the first and third column. Rows that are too short,
/// not valid UTF-8, or carry a bad date or value are skipped.
pub fn parse_csv(data: impl AsRef<[u8]>) -> Parsed {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_ref());

    let (date_idx, value_idx) = match reader.byte_headers() {
        Ok(headers) => (
            column_index(headers, "date").unwrap_or(0),
            column_index(headers, "cpi").unwrap_or(2),
        ),
        Err(e) => {
            warn!("CSV header unreadable: {e}");
            return Parsed::default();
        }
    };

    let mut parsed = Parsed::default();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result
            .map_err(|e| e.to_string())
            .and_then(|rec| csv::StringRecord::from_byte_record(rec).map_err(|e| e.to_string()));
        match record {
            Ok(record) => parsed.push_row(
                row_no,
                record.get(date_idx),
                record.get(value_idx),
                CSV_DATE_FORMAT,
            ),
            Err(reason) => parsed.skip(row_no, &reason),
        }
    }
    parsed.report("CSV")
}

fn column_index(headers: &csv::ByteRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name.as_bytes()))
}

// ---------------------------------------------------------------------------
// JSON parser
// ---------------------------------------------------------------------------

/// Expected JSON schema (what the CSV → JSON converter writes):
///
/// ```json
/// [
///   { "date": "01-01-2023", "CPI": "101.25" },
///   ...
/// ]
/// ```
///
/// `CPI` may also be a plain JSON number.
pub fn parse_json(text: &str) -> Result<Parsed, LoadError> {
    parse_json_slice(text.as_bytes())
}

fn parse_json_slice(data: &[u8]) -> Result<Parsed, LoadError> {
    let root: JsonValue = serde_json::from_slice(data)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut parsed = Parsed::default();
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            parsed.skip(i, "not a JSON object");
            continue;
        };
        let date = obj.get("date").and_then(JsonValue::as_str);
        let value = obj.get(JSON_VALUE_FIELD).map(json_number_text);
        parsed.push_row(i, date, value.as_deref(), JSON_DATE_FORMAT);
    }
    Ok(parsed.report("JSON"))
}

fn json_number_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn parse_row(date: Option<&str>, value: Option<&str>, date_format: &str) -> Option<Observation> {
    let date = parse_date(date?, date_format)?;
    let value = value?.trim().parse::<f64>().ok()?;
    Observation::new(date, value)
}

/// Parse a date, tolerating a trailing time part (`2023-01-31T00:00:00`).
fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    let (date, rest) = NaiveDate::parse_and_remainder(s.trim(), format).ok()?;
    (rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')).then_some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn csv_keeps_order_and_values() {
        let text = "date,hhi,cpi\n2023-01-03,0.1,103.5\n2023-01-01,0.2,101\n2023-01-02,0.3,102.25\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.skipped, 0);
        let dates: Vec<_> = parsed.observations.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 3), date(2023, 1, 1), date(2023, 1, 2)]);
        let values: Vec<_> = parsed.observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![103.5, 101.0, 102.25]);
    }

    #[test]
    fn csv_skips_bad_rows_and_keeps_the_rest() {
        let text = "\
date,hhi,cpi
2023-01-01,0.1,100
2023-13-45,0.1,101
2023-01-02,0.1,102
2023-01-03,0.1,abc
2023-01-04,0.1,104
";
        let parsed = parse_csv(text);
        assert_eq!(parsed.observations.len(), 3);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.observations[2].date, date(2023, 1, 4));
    }

    #[test]
    fn csv_skips_short_and_empty_rows() {
        let text = "date,hhi,cpi\n2023-01-01,0.1\n2023-01-02,,\n2023-01-03,0.1,7\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.observations, vec![Observation::new(date(2023, 1, 3), 7.0).unwrap()]);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn csv_rejects_non_finite_values() {
        let text = "date,hhi,cpi\n2023-01-01,0,NaN\n2023-01-02,0,inf\n2023-01-03,0,1\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.observations.len(), 1);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn csv_finds_columns_by_header() {
        let text = "CPI,Date\n99.5,2023-02-01T00:00:00\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.observations, vec![Observation::new(date(2023, 2, 1), 99.5).unwrap()]);
    }

    #[test]
    fn csv_rejects_trailing_garbage_in_date() {
        let parsed = parse_csv("date,x,cpi\n2023-02-01junk,0,1\n");
        assert!(parsed.observations.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn csv_header_only_is_empty() {
        assert_eq!(parse_csv("date,hhi,cpi\n"), Parsed::default());
        assert_eq!(parse_csv(""), Parsed::default());
    }

    #[test]
    fn csv_row_with_invalid_utf8_is_skipped() {
        let mut data = b"date,hhi,cpi\n2023-01-01,0.1,100\n2023-01-02,".to_vec();
        data.push(0xE9);
        data.extend_from_slice(b",101\n2023-01-03,0.1,102\n");

        let parsed = parse_csv(&data);
        assert_eq!(parsed.skipped, 1);
        let dates: Vec<_> = parsed.observations.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 1), date(2023, 1, 3)]);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cpi.csv");
        std::fs::write(&path, &data).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.observations.len(), 2);
        assert_eq!(loaded.skipped, 1);
    }

    #[test]
    fn json_records_use_day_first_dates() {
        let text = r#"[
            {"date": "31-01-2023", "hhi": "0.1", "CPI": "101.5"},
            {"date": "2023-02-01", "CPI": "102"},
            {"date": "02-02-2023", "CPI": 103},
            {"date": "03-02-2023", "CPI": "n/a"},
            "garbage",
            {"date": "04-02-2023"}
        ]"#;
        let parsed = parse_json(text).unwrap();
        assert_eq!(
            parsed.observations,
            vec![
                Observation::new(date(2023, 1, 31), 101.5).unwrap(),
                Observation::new(date(2023, 2, 2), 103.0).unwrap(),
            ]
        );
        assert_eq!(parsed.skipped, 4);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(matches!(parse_json(r#"{"date": "01-01-2023"}"#), Err(LoadError::NotAnArray)));
        assert!(matches!(parse_json("[1,"), Err(LoadError::Json(_))));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();

        let csv_path = dir.path().join("cpi.csv");
        std::fs::write(&csv_path, "date,hhi,cpi\n2023-01-01,0,1\n").unwrap();
        assert_eq!(load_file(&csv_path).unwrap().observations.len(), 1);

        let json_path = dir.path().join("cpi.JSON");
        std::fs::write(&json_path, r#"[{"date":"01-01-2023","CPI":"1"}]"#).unwrap();
        assert_eq!(load_file(&json_path).unwrap().observations.len(), 1);

        let other = dir.path().join("cpi.parquet");
        assert!(matches!(load_file(&other), Err(LoadError::UnsupportedFormat(ext)) if ext == "parquet"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
