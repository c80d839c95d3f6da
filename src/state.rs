use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::convert::to_spectrogram;
use crate::data::model::{LogHeader, Spectrogram, TimeFormat, VibrationLog};
use crate::data::scale::DisplayBounds;
use crate::raster::Raster;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the window shows, computed once at start-up.
pub struct AppState {
    /// File name shown in the top bar.
    pub source_name: String,

    pub header: LogHeader,

    /// Clock the timestamps came from.
    pub time_format: TimeFormat,

    /// Converted grid (shared with the hover formatter).
    pub spectrogram: Arc<Spectrogram>,

    /// Color limits and frequency clipping.
    pub bounds: DisplayBounds,

    /// Pixels uploaded as the plot texture.
    pub raster: Raster,

    pub color_map: ColorMap,

    /// Apply the default view on the next frame.
    pub reset_view: bool,
}

impl AppState {
    /// Convert a loaded log and prepare everything the renderer needs.
    pub fn from_log(vib_log: &VibrationLog, path: &Path) -> Self {
        let spectrogram = to_spectrogram(vib_log);
        let bounds = DisplayBounds::from_spectrogram(&spectrogram);
        let color_map = ColorMap::viridis();
        let raster = Raster::render(&spectrogram, &bounds, &color_map);

        log::debug!(
            "Display bounds: color 0..{} g, frequency {}..{} Hz",
            bounds.vmax,
            bounds.fmin,
            bounds.fmax
        );

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            source_name,
            header: vib_log.header.clone(),
            time_format: vib_log.time_format,
            spectrogram: Arc::new(spectrogram),
            bounds,
            raster,
            color_map,
            reset_view: true,
        }
    }

    /// Default view: the whole time extent, frequencies clipped to the
    /// rounded limits. Returns `([x_min, y_min], [x_max, y_max])`.
    pub fn default_view(&self) -> ([f64; 2], [f64; 2]) {
        let (x_min, x_max) = self.raster.x_range;
        (
            [x_min, self.bounds.fmin],
            [x_max, self.bounds.fmax],
        )
    }

    /// One-line summary of the data for the top bar.
    pub fn summary(&self) -> String {
        format!(
            "{} samples × {} bins over {:.2} s ({})",
            self.spectrogram.n_times(),
            self.spectrogram.n_freqs(),
            self.spectrogram.duration_s(),
            self.time_format
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_log;

    #[test]
    fn builds_state_for_minimal_scenario() {
        let vib_log = parse_log("header\nlabel\t10.0\t20.0\t30.0\nmeta\n0\t9.80665\t19.6133\t0\n").unwrap();
        let state = AppState::from_log(&vib_log, Path::new("/tmp/logs/vibFftAcf_z_flatTop.txt"));

        assert_eq!(state.source_name, "vibFftAcf_z_flatTop.txt");
        assert_eq!(state.spectrogram.times_s, vec![0.0]);
        assert_eq!(state.spectrogram.row(0), &[1.0, 2.0, 0.0]);
        assert_eq!(state.bounds.vmax, 2.0);
        assert_eq!(state.default_view(), ([-0.5, 10.0], [0.5, 30.0]));
        assert!(state.reset_view);
        assert_eq!(state.summary(), "1 samples × 3 bins over 0.00 s (device clock)");
    }
}
