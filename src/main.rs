use torchlearn::{
    core::{
        settings::SETTINGS_FILE,
        Settings,
    },
    gui::TorchLearnApp,
    persistence::load_json_or_default,
};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_json_or_default::<Settings>(SETTINGS_FILE).with_env_overrides();

    let source = match settings.build_source() {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to set up card source: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("TorchLearn")
            .with_inner_size([860.0, 900.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TorchLearn",
        options,
        Box::new(move |cc| Ok(Box::new(TorchLearnApp::new(cc, settings, source)))),
    )
}
