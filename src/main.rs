mod app;
mod cli;
mod color;
mod data;
mod raster;
mod state;
mod ui;

use app::SpectrogramApp;
use cli::Invocation;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let path = match cli::parse_args(std::env::args_os()) {
        Invocation::Usage => {
            println!("{}", cli::usage());
            return Ok(());
        }
        Invocation::Open(path) => path,
    };

    let vib_log = match data::loader::load_file(&path) {
        Ok(vib_log) => vib_log,
        Err(e) => {
            log::error!("Failed to load {}: {e:?}", path.display());
            println!("{e}");
            return Ok(());
        }
    };
    log::info!(
        "Loaded {} samples x {} bins from {} ({}, {} timestamps)",
        vib_log.len(),
        vib_log.bin_count(),
        path.display(),
        vib_log.header,
        vib_log.time_format
    );

    let state = AppState::from_log(&vib_log, &path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(ui::panels::TITLE)
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(SpectrogramApp::new(state)))),
    )
}
