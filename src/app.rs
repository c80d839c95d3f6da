use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectrogramApp {
    pub state: AppState,
    /// Uploaded on the first frame.
    texture: Option<TextureHandle>,
}

impl SpectrogramApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            texture: None,
        }
    }

    fn texture(&mut self, ctx: &egui::Context) -> TextureHandle {
        self.texture
            .get_or_insert_with(|| {
                let raster = &self.state.raster;
                let image =
                    ColorImage::from_rgba_unmultiplied([raster.width, raster.height], &raster.rgba());
                ctx.load_texture("spectrogram", image, TextureOptions::NEAREST)
            })
            .clone()
    }
}

impl eframe::App for SpectrogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let texture = self.texture(ctx);

        // ---- Top panel: title and log details ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Right side panel: color bar ----
        egui::SidePanel::right("color_bar")
            .resizable(false)
            .show(ctx, |ui| {
                panels::color_bar(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrogram_plot(ui, &mut self.state, &texture);
        });
    }
}
