mod app;
mod chart;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use clap::Parser;
use eframe::egui;

use cli::Args;
use config::DashboardConfig;
use state::AppState;

fn main() -> eframe::Result {
    let args = Args::parse();

    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = DashboardConfig::resolve(&args).unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to default settings");
        let mut config = DashboardConfig::default();
        config.merge_with_args(&args);
        config
    });

    let mut state = AppState::new(config.display.clone(), config.data.station.clone());

    if let Some(path) = &config.data.path {
        match data::loader::load_file(path) {
            Ok(dataset) => {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                state.set_dataset(dataset, name);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard Kualitas Udara",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}

fn handle_init_config() -> anyhow::Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
    }

    std::fs::write(path, DashboardConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {} with default settings.", path.display());
    Ok(())
}
