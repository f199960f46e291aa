// Clinic Scheduler Application
// Main entry point

use clinic_scheduler::services::settings::SettingsService;
use clinic_scheduler::ui_egui::SchedulerApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Clinic Scheduler");

    let settings_service = SettingsService::from_default_location();
    let settings = settings_service.load_or_default();
    log::info!(
        "Grid settings from {}: {}:00-{}:00, {} px/h",
        settings_service.path().display(),
        settings.start_hour,
        settings.end_hour,
        settings.pixels_per_hour
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clinic Scheduler")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Clinic Scheduler",
        options,
        Box::new(move |cc| Ok(Box::new(SchedulerApp::new(cc, settings)?))),
    )
}
