use super::model::{Spectrogram, TimeFormat, VibrationLog};

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Microseconds to seconds.
const US_TO_S: f64 = 1e-6;

/// Period of the device's 32-bit microsecond counter.
pub const DEVICE_COUNTER_PERIOD_US: f64 = 4_294_967_296.0;

/// Convert a raw log to display units: seconds relative to the first sample
/// and magnitudes in g. No rounding or clamping happens here.
///
/// Device timestamps that run backwards are taken as a counter wrap and
/// unwrapped first.
pub fn to_spectrogram(log: &VibrationLog) -> Spectrogram {
    let timestamps_us = match log.time_format {
        TimeFormat::Microseconds => {
            let (unwrapped, wraps) = unwrap_device_counter(&log.timestamps_us);
            if wraps > 0 {
                log::warn!("Device timestamp counter wrapped {wraps} time(s); unwrapped before display");
            }
            unwrapped
        }
        TimeFormat::Iso8601 => log.timestamps_us.clone(),
    };

    Spectrogram {
        times_s: relative_seconds(&timestamps_us),
        frequencies_hz: log.frequencies_hz.clone(),
        magnitudes_g: log
            .magnitudes
            .iter()
            .flat_map(|row| row.iter().map(|&m| m / STANDARD_GRAVITY))
            .collect(),
    }
}

/// `(t[i] - t[0]) * 1e-6`
pub fn relative_seconds(timestamps_us: &[f64]) -> Vec<f64> {
    let Some(&first) = timestamps_us.first() else {
        return Vec::new();
    };
    timestamps_us
        .iter()
        .map(|&t| (t - first) * US_TO_S)
        .collect()
}

/// Add one counter period for every backwards step of a 32-bit µs counter.
///
/// Sequences holding values outside the counter's range are returned as-is.
/// Returns the unwrapped timestamps and the number of wraps found.
pub fn unwrap_device_counter(timestamps_us: &[f64]) -> (Vec<f64>, usize) {
    let in_range = |t: f64| (0.0..DEVICE_COUNTER_PERIOD_US).contains(&t);
    if !timestamps_us.iter().all(|&t| in_range(t)) {
        return (timestamps_us.to_vec(), 0);
    }

    let mut wraps = 0;
    let mut previous = None;
    let unwrapped = timestamps_us
        .iter()
        .map(|&t| {
            if previous.is_some_and(|p| t < p) {
                wraps += 1;
            }
            previous = Some(t);
            t + wraps as f64 * DEVICE_COUNTER_PERIOD_US
        })
        .collect();

    (unwrapped, wraps)
}
