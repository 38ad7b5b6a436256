// Countdown Overlay
// Main entry point

use countdown_overlay::config::AppConfig;
use countdown_overlay::ui_egui::CountdownApp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Countdown Overlay");

    let config = AppConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Countdown Control")
            .with_inner_size([420.0, 360.0])
            .with_min_inner_size([360.0, 280.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Countdown Control",
        options,
        Box::new(move |cc| Ok(Box::new(CountdownApp::new(cc, config)))),
    );

    if let Err(e) = result {
        log::error!("Failed to start the user interface: {}", e);
        eprintln!("countdown-overlay: cannot open a window: {}", e);
        std::process::exit(1);
    }
}
