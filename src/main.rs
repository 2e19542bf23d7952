mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use app::QuakeFilterApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.list {
        return cli::run_list(&cli, &mut std::io::stdout().lock());
    }

    let mut state = AppState::with_criteria(cli.criteria());
    if let Some(path) = &cli.path {
        ui::panels::load_into_state(&mut state, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Quake Filter – Earthquake Magnitude Filter",
        options,
        Box::new(|_cc| Ok(Box::new(QuakeFilterApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
