use std::fmt;

// ---------------------------------------------------------------------------
// LogHeader – line 0 of a vibMonFft log
// ---------------------------------------------------------------------------

/// Metadata carried by the first line of a log file.
///
/// The logger writes
/// `vibMonFft (z, flatTop) - ACF (Amplitude Correction Factor) - fSampling: 2000.000000000Hz - binCount: 512`.
/// Every field besides `title` is optional: a header that doesn't follow this
/// layout is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogHeader {
    /// The whole header line, trimmed.
    pub title: String,
    /// Sensor axis the FFT was computed on (`x`, `y` or `z`).
    pub axis: Option<String>,
    /// FFT window (`rectangular`, `hanning`, `flatTop`).
    pub window: Option<String>,
    /// Accelerometer sampling frequency in Hz.
    pub sampling_hz: Option<f64>,
    /// Number of FFT bins announced by the logger.
    pub bin_count: Option<usize>,
}

impl LogHeader {
    /// Parse the header line. Never fails.
    pub fn parse(line: &str) -> Self {
        let title = line.trim().to_string();

        let (axis, window) = match paren_group(&title, "vibMonFft") {
            Some(inner) => match inner.split_once(',') {
                Some((axis, window)) => (
                    non_empty(axis.trim()),
                    non_empty(window.trim()),
                ),
                None => (non_empty(inner.trim()), None),
            },
            None => (None, None),
        };

        let sampling_hz = field_after(&title, "fSampling:")
            .map(|v| v.trim_end_matches("Hz"))
            .and_then(|v| v.parse::<f64>().ok());
        let bin_count = field_after(&title, "binCount:").and_then(|v| v.parse::<usize>().ok());

        LogHeader {
            title,
            axis,
            window,
            sampling_hz,
            bin_count,
        }
    }
}

impl fmt::Display for LogHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(axis) = &self.axis {
            parts.push(format!("axis {axis}"));
        }
        if let Some(window) = &self.window {
            parts.push(format!("{window} window"));
        }
        if let Some(fs) = self.sampling_hz {
            parts.push(format!("fSampling {fs:.1} Hz"));
        }
        if let Some(n) = self.bin_count {
            parts.push(format!("{n} bins"));
        }
        if parts.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Content of the parenthesised group that follows `prefix`.
fn paren_group<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(prefix)?.trim_start();
    let rest = rest.strip_prefix('(')?;
    let end = rest.find(')')?;
    Some(&rest[..end])
}

/// First whitespace-delimited token after `key`, if any.
fn field_after<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let start = text.find(key)? + key.len();
    text[start..].split_whitespace().next()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// TimeFormat – how the first column is written
// ---------------------------------------------------------------------------

/// Encoding of the timestamp column, selected by its title on line 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// Device timestamps in microseconds (`timestamp`, unit `(us)`).
    Microseconds,
    /// UTC date-times (`iso8601Time`), converted to µs since the Unix epoch.
    Iso8601,
}

impl TimeFormat {
    pub fn from_column_title(title: &str) -> Self {
        if title.trim() == "iso8601Time" {
            TimeFormat::Iso8601
        } else {
            TimeFormat::Microseconds
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Microseconds => write!(f, "device clock"),
            TimeFormat::Iso8601 => write!(f, "UTC"),
        }
    }
}

// ---------------------------------------------------------------------------
// VibrationLog – the file as read, in raw units
// ---------------------------------------------------------------------------

/// A parsed log file. Timestamps in µs, magnitudes in m/s².
#[derive(Debug, Clone)]
pub struct VibrationLog {
    pub header: LogHeader,
    pub time_format: TimeFormat,
    /// Frequency axis (Hz), one entry per bin.
    pub frequencies_hz: Vec<f64>,
    /// Raw timestamps, one per row.
    pub timestamps_us: Vec<f64>,
    /// Magnitudes, one `Vec` of `frequencies_hz.len()` values per row.
    pub magnitudes: Vec<Vec<f64>>,
}

impl VibrationLog {
    /// Number of time samples (rows).
    pub fn len(&self) -> usize {
        self.timestamps_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_us.is_empty()
    }

    /// Number of frequency bins.
    pub fn bin_count(&self) -> usize {
        self.frequencies_hz.len()
    }
}

// ---------------------------------------------------------------------------
// Spectrogram – display units
// ---------------------------------------------------------------------------

/// The converted grid handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Seconds since the first sample.
    pub times_s: Vec<f64>,
    pub frequencies_hz: Vec<f64>,
    /// Magnitudes in g, row-major: `times_s.len()` rows of
    /// `frequencies_hz.len()` values.
    pub magnitudes_g: Vec<f64>,
}

impl Spectrogram {
    pub fn n_times(&self) -> usize {
        self.times_s.len()
    }

    pub fn n_freqs(&self) -> usize {
        self.frequencies_hz.len()
    }

    /// Magnitude (g) of time sample `t` at bin `f`.
    pub fn at(&self, t: usize, f: usize) -> f64 {
        self.row(t)[f]
    }

    /// One time sample across all bins.
    pub fn row(&self, t: usize) -> &[f64] {
        let n = self.n_freqs();
        &self.magnitudes_g[t * n..(t + 1) * n]
    }

    /// Time span covered by the sample centres, in seconds.
    pub fn duration_s(&self) -> f64 {
        match (self.times_s.first(), self.times_s.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
