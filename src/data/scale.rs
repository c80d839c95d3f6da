use super::model::Spectrogram;

/// Smallest upper color limit, in g, so a quiet signal isn't blown up.
pub const MIN_COLOR_SCALE_G: f64 = 1.0;

/// Frequency limits snap outward to multiples of this, in Hz.
pub const FREQ_ROUNDING_HZ: f64 = 10.0;

/// Color and frequency limits of the rendered spectrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    /// Lower color limit (g), always 0.
    pub vmin: f64,
    /// Upper color limit (g), a whole number ≥ 1.
    pub vmax: f64,
    pub fmin: f64,
    pub fmax: f64,
}

impl DisplayBounds {
    pub fn from_spectrogram(sg: &Spectrogram) -> Self {
        let (fmin, fmax) = frequency_limits(&sg.frequencies_hz);
        DisplayBounds {
            vmin: 0.0,
            vmax: color_limit(&sg.magnitudes_g),
            fmin,
            fmax,
        }
    }
}

/// `ceil(max(max(values), 1.0))`. NaN cells are ignored.
pub fn color_limit(values_g: &[f64]) -> f64 {
    values_g
        .iter()
        .copied()
        .fold(MIN_COLOR_SCALE_G, f64::max)
        .ceil()
}

/// Frequency range rounded outward to the nearest 10 Hz.
pub fn frequency_limits(frequencies_hz: &[f64]) -> (f64, f64) {
    let min = frequencies_hz.iter().copied().fold(f64::INFINITY, f64::min);
    let max = frequencies_hz
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, FREQ_ROUNDING_HZ);
    }
    (
        (min / FREQ_ROUNDING_HZ).floor() * FREQ_ROUNDING_HZ,
        (max / FREQ_ROUNDING_HZ).ceil() * FREQ_ROUNDING_HZ,
    )
}
