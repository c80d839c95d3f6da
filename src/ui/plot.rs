use std::sync::Arc;

use eframe::egui::{self, TextureHandle, Ui};
use egui_plot::{Plot, PlotBounds, PlotImage, PlotPoint};

use crate::raster::Raster;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectrogram plot (central panel)
// ---------------------------------------------------------------------------

/// Render the spectrogram image with time on x and frequency on y.
pub fn spectrogram_plot(ui: &mut Ui, state: &mut AppState, texture: &TextureHandle) {
    let (x_min, x_max) = state.raster.x_range;
    let (y_min, y_max) = state.raster.y_range;
    let center = PlotPoint::new((x_min + x_max) / 2.0, (y_min + y_max) / 2.0);
    let size = egui::vec2((x_max - x_min) as f32, (y_max - y_min) as f32);

    let (view_min, view_max) = state.default_view();
    let reset = std::mem::take(&mut state.reset_view);
    let spectrogram = Arc::clone(&state.spectrogram);

    Plot::new("spectrogram_plot")
        .x_axis_label("Time (s)")
        .y_axis_label("Frequency (Hz)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .allow_double_click_reset(false)
        .label_formatter(move |_name, value| {
            match Raster::sample_at(&spectrogram, value.x, value.y) {
                Some(g) => format!("{:.3} s\n{:.1} Hz\n{g:.3} g", value.x, value.y),
                None => format!("{:.3} s\n{:.1} Hz", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(texture.id(), center, size));

            // Double-click goes back to the clipped frequency range rather
            // than the full image extent.
            if reset || plot_ui.response().double_clicked() {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(view_min, view_max));
            }
        });
}
