use std::path::Path;

use csv::StringRecord;

use super::error::LoadError;
use super::model::{LogHeader, TimeFormat, VibrationLog};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Physical line (1-based) holding the header text.
const HEADER_LINE: u64 = 1;
/// Physical line holding the time-column title and the frequency bins.
const AXIS_LINE: u64 = 2;
/// Physical line holding the column units.
const UNITS_LINE: u64 = 3;

/// Read a vibMonFft log from disk.
///
/// The file is read into memory in one go and the handle is dropped before
/// any parsing happens.
pub fn load_file(path: &Path) -> Result<VibrationLog, LoadError> {
    let text = std::fs::read_to_string(path)?;
    parse_log(&text)
}

/// Parse the content of a log file.
///
/// Layout (tab separated):
///
/// ```text
/// vibMonFft (z, flatTop) - ACF (Amplitude Correction Factor) - fSampling: 2000.000000000Hz - binCount: 512
/// timestamp   0.00    3.91    7.81    ...
/// (us)        (m.s^-2) (m.s^-2) ...
/// 1027441     0.012   0.004   0.007   ...
/// ```
///
/// The frequency axis and the data table come out of the same pass, and
/// every data row is checked against the axis length.
///
/// An `iso8601Time` log holds plain device microseconds until the logger has
/// a valid UTC time. Those rows are dropped once UTC rows exist; a log that
/// never got UTC is read on the device clock instead.
pub fn parse_log(text: &str) -> Result<VibrationLog, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut header = LogHeader::default();
    let mut axis: Option<(TimeFormat, Vec<f64>)> = None;
    let mut device_rows = Rows::default();
    let mut utc_rows = Rows::default();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        match line {
            HEADER_LINE => {
                header = LogHeader::parse(&record.iter().collect::<Vec<_>>().join("\t"));
            }
            AXIS_LINE => axis = Some(parse_axis(&record)?),
            UNITS_LINE => {}
            _ => {
                let Some((time_format, frequencies)) = &axis else {
                    return Err(LoadError::AxisParse);
                };
                let fields = trimmed_fields(&record);
                let Some((time, values)) = fields.split_first() else {
                    continue; // whitespace-only line
                };

                if values.len() != frequencies.len() {
                    return Err(LoadError::ShapeMismatch {
                        line,
                        expected: frequencies.len(),
                        found: values.len(),
                    });
                }

                let timestamp = parse_time(time, *time_format).ok_or_else(|| LoadError::Table {
                    line,
                    column: 1,
                    token: time.to_string(),
                })?;

                let row = values
                    .iter()
                    .enumerate()
                    .map(|(j, tok)| {
                        tok.parse::<f64>().map_err(|_| LoadError::Table {
                            line,
                            column: j + 2,
                            token: tok.to_string(),
                        })
                    })
                    .collect::<Result<Vec<f64>, _>>()?;

                match timestamp {
                    RowTime::Device(us) => device_rows.push(line, us, row),
                    RowTime::Utc(us) => utc_rows.push(line, us, row),
                }
            }
        }
    }

    let Some((axis_format, frequencies_hz)) = axis else {
        return Err(LoadError::AxisParse);
    };

    let (time_format, rows) = if utc_rows.is_empty() {
        if axis_format == TimeFormat::Iso8601 && !device_rows.is_empty() {
            log::warn!("No row carries a UTC time; using device timestamps (µs)");
        }
        (TimeFormat::Microseconds, device_rows)
    } else {
        if let Some(first) = device_rows.first_line {
            log::warn!(
                "Skipped {} row(s) logged before UTC time was valid, starting at line {first}",
                device_rows.timestamps_us.len()
            );
        }
        (TimeFormat::Iso8601, utc_rows)
    };

    if let Some(announced) = header.bin_count {
        if announced != frequencies_hz.len() {
            log::warn!(
                "Header announces {announced} bins but the frequency axis has {}",
                frequencies_hz.len()
            );
        }
    }

    let vib_log = VibrationLog {
        header,
        time_format,
        frequencies_hz,
        timestamps_us: rows.timestamps_us,
        magnitudes: rows.magnitudes,
    };
    if vib_log.is_empty() {
        return Err(LoadError::NoSamples);
    }
    Ok(vib_log)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fields of a record without the trailing empty ones a stray tab leaves.
fn trimmed_fields(record: &StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Time-column title followed by one frequency per bin.
fn parse_axis(record: &StringRecord) -> Result<(TimeFormat, Vec<f64>), LoadError> {
    let fields = trimmed_fields(record);
    let (title, bins) = fields.split_first().ok_or(LoadError::AxisParse)?;
    if bins.is_empty() {
        return Err(LoadError::AxisParse);
    }

    let frequencies = bins
        .iter()
        .map(|tok| tok.parse::<f64>().map_err(|_| LoadError::AxisParse))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok((TimeFormat::from_column_title(title), frequencies))
}

/// Data rows read against one clock.
#[derive(Default)]
struct Rows {
    first_line: Option<u64>,
    timestamps_us: Vec<f64>,
    magnitudes: Vec<Vec<f64>>,
}

impl Rows {
    fn push(&mut self, line: u64, timestamp_us: f64, row: Vec<f64>) {
        self.first_line.get_or_insert(line);
        self.timestamps_us.push(timestamp_us);
        self.magnitudes.push(row);
    }

    fn is_empty(&self) -> bool {
        self.timestamps_us.is_empty()
    }
}

/// A row timestamp in microseconds, tagged with its clock.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RowTime {
    /// Device counter.
    Device(f64),
    /// Since the Unix epoch.
    Utc(f64),
}

fn parse_time(token: &str, format: TimeFormat) -> Option<RowTime> {
    match format {
        TimeFormat::Microseconds => token.parse::<f64>().ok().map(RowTime::Device),
        TimeFormat::Iso8601 => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(token) {
                return Some(RowTime::Utc(dt.timestamp_micros() as f64));
            }
            // Written while UTC was not valid yet.
            token.parse::<u64>().ok().map(|us| RowTime::Device(us as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str =
        "vibMonFft (z, flatTop) - ACF (Amplitude Correction Factor) - fSampling: 2000.000000000Hz - binCount: 3";

    fn log_text(axis: &str, rows: &[&str]) -> String {
        let mut text = format!("{HEADER}\n{axis}\n(us)\t(m.s^-2)\t(m.s^-2)\t(m.s^-2)\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_minimal_scenario() {
        let text = "header\nlabel\t10.0\t20.0\t30.0\nmeta\n0\t9.80665\t19.6133\t0\n";
        let log = parse_log(text).unwrap();

        assert_eq!(log.frequencies_hz, vec![10.0, 20.0, 30.0]);
        assert_eq!(log.timestamps_us, vec![0.0]);
        assert_eq!(log.magnitudes, vec![vec![9.80665, 19.6133, 0.0]]);
        assert_eq!(log.time_format, TimeFormat::Microseconds);
        assert_eq!(log.header.title, "header");
    }

    #[test]
    fn parses_logger_output() {
        let text = log_text(
            "timestamp\t0.00\t666.67\t1333.33",
            &[
                "1000000\t0.010000000\t0.020000000\t0.030000000",
                "1500000\t0.040000000\t0.050000000\t0.060000000",
                "2000000\t0.070000000\t0.080000000\t0.090000000",
            ],
        );
        let log = parse_log(&text).unwrap();

        assert_eq!(log.len(), 3);
        assert_eq!(log.bin_count(), 3);
        assert_eq!(log.header.axis.as_deref(), Some("z"));
        assert_eq!(log.header.bin_count, Some(3));
        assert_eq!(log.timestamps_us, vec![1_000_000.0, 1_500_000.0, 2_000_000.0]);
        assert_eq!(log.magnitudes[2], vec![0.07, 0.08, 0.09]);
    }

    #[test]
    fn tolerates_crlf_blank_lines_and_trailing_tabs() {
        let text = "h\r\nlabel\t10\t20\t\r\nunits\r\n\r\n5\t1\t2\t\r\n\r\n6\t3\t4\r\n";
        let log = parse_log(text).unwrap();

        assert_eq!(log.frequencies_hz, vec![10.0, 20.0]);
        assert_eq!(log.timestamps_us, vec![5.0, 6.0]);
        assert_eq!(log.magnitudes, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn parses_iso8601_timestamps() {
        let text = log_text(
            "iso8601Time\t10\t20\t30",
            &[
                "2024-05-01T10:00:00.000000Z\t1\t2\t3",
                "2024-05-01T10:00:00.250000Z\t4\t5\t6",
            ],
        );
        let log = parse_log(&text).unwrap();

        assert_eq!(log.time_format, TimeFormat::Iso8601);
        assert_eq!(log.timestamps_us[1] - log.timestamps_us[0], 250_000.0);
    }

    #[test]
    fn iso_log_skips_rows_before_utc_fix() {
        let text = log_text(
            "iso8601Time\t10\t20\t30",
            &[
                "                    1027441\t1\t2\t3",
                "                    1527441\t1\t2\t3",
                "2024-05-01T10:00:00.000000Z\t4\t5\t6",
                "2024-05-01T10:00:00.500000Z\t7\t8\t9",
            ],
        );
        let log = parse_log(&text).unwrap();

        assert_eq!(log.time_format, TimeFormat::Iso8601);
        assert_eq!(log.len(), 2);
        assert_eq!(log.magnitudes[0], vec![4.0, 5.0, 6.0]);
        assert_eq!(log.timestamps_us[1] - log.timestamps_us[0], 500_000.0);
    }

    #[test]
    fn iso_log_without_utc_uses_device_clock() {
        let text = log_text("iso8601Time\t10\t20\t30", &["1027441\t1\t2\t3", "1527441\t4\t5\t6"]);
        let log = parse_log(&text).unwrap();

        assert_eq!(log.time_format, TimeFormat::Microseconds);
        assert_eq!(log.timestamps_us, vec![1_027_441.0, 1_527_441.0]);
    }

    #[test]
    fn iso_log_rejects_fractional_device_time() {
        let text = log_text("iso8601Time\t10\t20\t30", &["1027441.5\t1\t2\t3"]);
        assert!(matches!(
            parse_log(&text),
            Err(LoadError::Table { line: 4, column: 1, .. })
        ));
    }

    #[test]
    fn non_numeric_frequency_is_axis_error() {
        let text = log_text("timestamp\t10\tabc\t30", &["0\t1\t2\t3"]);
        assert!(matches!(parse_log(&text), Err(LoadError::AxisParse)));
    }

    #[test]
    fn missing_axis_line_is_axis_error() {
        assert!(matches!(parse_log(""), Err(LoadError::AxisParse)));
        assert!(matches!(parse_log("only a header\n"), Err(LoadError::AxisParse)));
        assert!(matches!(parse_log("header\ntimestamp\n"), Err(LoadError::AxisParse)));
    }

    #[test]
    fn axis_error_message() {
        assert_eq!(
            LoadError::AxisParse.to_string(),
            "Error: Unable to parse frequency axis."
        );
    }

    #[test]
    fn row_with_wrong_width_is_shape_mismatch() {
        let text = log_text("timestamp\t10\t20\t30", &["0\t1\t2\t3", "1\t1\t2"]);
        match parse_log(&text) {
            Err(LoadError::ShapeMismatch { line, expected, found }) => {
                assert_eq!(line, 5);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_reports_position() {
        let text = log_text("timestamp\t10\t20\t30", &["0\t1\tnope\t3"]);
        match parse_log(&text) {
            Err(LoadError::Table { line, column, token }) => {
                assert_eq!(line, 4);
                assert_eq!(column, 3);
                assert_eq!(token, "nope");
            }
            other => panic!("expected Table error, got {other:?}"),
        }
    }

    #[test]
    fn bad_iso_time_is_table_error() {
        let text = log_text("iso8601Time\t10\t20\t30", &["yesterday\t1\t2\t3"]);
        assert!(matches!(
            parse_log(&text),
            Err(LoadError::Table { column: 1, .. })
        ));
    }

    #[test]
    fn header_only_file_has_no_samples() {
        let text = log_text("timestamp\t10\t20\t30", &[]);
        assert!(matches!(parse_log(&text), Err(LoadError::NoSamples)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", log_text("timestamp\t10\t20\t30", &["0\t1\t2\t3"])).unwrap();

        let log = load_file(file.path()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.bin_count(), 3);
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("does_not_exist.txt")).unwrap_err();

        assert!(matches!(err, LoadError::FileAccess(_)));
        assert!(err.to_string().starts_with("Error opening file: "));
    }
}
