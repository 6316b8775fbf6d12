use voxview::config::AppConfig;
use voxview::constants::window;
use voxview::source::display_name_from_url;
use voxview::ViewerApp;

/// Main application entry point.
///
/// Usage: `voxview <volume-url-or-path> [display-name]`
fn main() -> eframe::Result {
    let config = AppConfig::load_from_default_path().unwrap_or_default();

    env_logger::Builder::from_default_env()
        .filter_level(config.log_level.to_level_filter())
        .init();

    let mut args = std::env::args().skip(1);
    // An empty URL is allowed here; the controller reports it as a
    // missing-input error on the error screen.
    let url = args.next().unwrap_or_default();
    let name = args.next().unwrap_or_else(|| display_name_from_url(&url));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(window::DEFAULT_SIZE)
            .with_min_inner_size(window::MIN_SIZE)
            .with_title("voxview"),
        ..Default::default()
    };

    eframe::run_native(
        "voxview",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, &config, &url, &name)))),
    )
}
