mod error;
mod loader;
mod model;
mod policy;
mod report;
mod ui;

use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::RestockApp;

fn main() -> eframe::Result<()> {
    // Logging defaults to info; override with RUST_LOG.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();

    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sales_history.csv".to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 950.0])
            .with_min_inner_size([1100.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Safety Stock & Reorder Point Analyzer",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(RestockApp::new(data_path)))
        }),
    )
}
