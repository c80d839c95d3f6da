use eframe::egui::{self, Align2, FontId, RichText, Sense, Ui};

use crate::state::AppState;

/// Plot title, matching the window title.
pub const TITLE: &str = "Vibration FFT Spectrogram (in g)";

const BAR_WIDTH: f32 = 22.0;
const LABEL_WIDTH: f32 = 36.0;
const STRIPS: usize = 128;
const MAX_TICKS: f64 = 10.0;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Title plus what the log header says about the recording.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(TITLE);
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(&state.source_name).strong());
        ui.separator();
        ui.label(state.header.to_string());
        ui.separator();
        ui.label(state.summary());
    });
}

// ---------------------------------------------------------------------------
// Color bar (right panel)
// ---------------------------------------------------------------------------

/// Vertical color scale from vmin (bottom) to vmax (top).
pub fn color_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label("Magnitude (g)");
    });
    ui.add_space(4.0);

    let height = (ui.available_height() - 12.0).max(40.0);
    let (rect, _response) =
        ui.allocate_exact_size(egui::vec2(BAR_WIDTH + LABEL_WIDTH, height), Sense::hover());
    let painter = ui.painter_at(rect.expand(6.0));

    let bar = egui::Rect::from_min_size(rect.min, egui::vec2(BAR_WIDTH, height));
    let strip_height = height / STRIPS as f32;
    for i in 0..STRIPS {
        // Strip 0 sits at the top and shows the top of the scale.
        let t = 1.0 - (i as f64 + 0.5) / STRIPS as f64;
        let strip = egui::Rect::from_min_size(
            bar.min + egui::vec2(0.0, i as f32 * strip_height),
            egui::vec2(BAR_WIDTH, strip_height + 0.5),
        );
        painter.rect_filled(strip, 0.0, state.color_map.color_at(t));
    }

    let (vmin, vmax) = (state.bounds.vmin, state.bounds.vmax);
    let text_color = ui.visuals().text_color();
    for tick in ticks(vmin, vmax) {
        let frac = ((tick - vmin) / (vmax - vmin)) as f32;
        let y = bar.max.y - frac * height;
        painter.line_segment(
            [egui::pos2(bar.max.x, y), egui::pos2(bar.max.x + 4.0, y)],
            egui::Stroke::new(1.0, text_color),
        );
        painter.text(
            egui::pos2(bar.max.x + 6.0, y),
            Align2::LEFT_CENTER,
            format!("{tick}"),
            FontId::proportional(11.0),
            text_color,
        );
    }
}

/// Whole-number ticks from `vmin` to `vmax`, at most about ten of them.
pub fn ticks(vmin: f64, vmax: f64) -> Vec<f64> {
    if vmax <= vmin {
        return vec![vmin];
    }
    let step = ((vmax - vmin) / MAX_TICKS).ceil().max(1.0);
    let count = ((vmax - vmin) / step).floor() as usize;
    (0..=count).map(|i| vmin + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_for_small_scale() {
        assert_eq!(ticks(0.0, 1.0), vec![0.0, 1.0]);
        assert_eq!(ticks(0.0, 3.0), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn ticks_for_large_scale_are_thinned() {
        let t = ticks(0.0, 45.0);
        assert_eq!(t, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0]);
    }

    #[test]
    fn degenerate_scale_has_one_tick() {
        assert_eq!(ticks(2.0, 2.0), vec![2.0]);
    }
}
