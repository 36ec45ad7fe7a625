mod app;
mod config;
mod data;
mod processing;
mod render;
mod state;
mod ui;

use app::ScatterStatApp;
use config::AppConfig;
use eframe::egui;
use eframe::egui_wgpu;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}; falling back to defaults");
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("scatterstat")
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([720.0, 480.0]),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "scatterstat",
        options,
        Box::new(|cc| Ok(Box::new(ScatterStatApp::new(cc, config)))),
    )
}
