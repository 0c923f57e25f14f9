#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eframe::NativeOptions;
use tokio::runtime::Runtime;

use pattern_pro::config::PERSISTENCE;
use pattern_pro::{AnalysisClient, AssistantEngine, Cli, run_app};

fn main() -> eframe::Result {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("pattern_pro"), my_code_level)
        .init();

    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let startup = match args.startup_options() {
        Ok(startup) => startup,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{:#}", e);
            std::process::exit(2);
        }
    };

    let engine = match build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Startup failed: {:#}", e);
            eprintln!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };
    if !engine.has_api_key() {
        log::warn!("No Gemini API key in the environment; analysis requests will fail");
    }

    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app.state_path)),
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Pattern Pro - Chart Pattern Analysis")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Pattern Pro",
        options,
        Box::new(move |cc| Ok(run_app(cc, engine, startup))),
    )
}

fn build_engine() -> anyhow::Result<AssistantEngine> {
    let runtime = Runtime::new()?;
    let client = AnalysisClient::from_env()?;
    Ok(AssistantEngine::new(Arc::new(runtime), client))
}
