#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod annotate;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod ui;
pub mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};

// Re-export commonly used types
pub use analysis::{AnalysisClient, AnalysisConfig, AnalysisError};
pub use annotate::AnnotationCanvas;
pub use data::{FeedConnector, Subscription};
pub use domain::{AgentDecision, AnalysisResult, Candle, EncodedImage, MarketTick};
pub use engine::AssistantEngine;
pub use ui::{PatternProApp, StartupOptions};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

use crate::config::FEED;
use crate::domain::InstrumentClass;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Symbol the live market widget subscribes to at startup (e.g. ETHUSDT)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Drive the widget from the simulated feed instead of the exchange
    #[arg(long, default_value_t = false)]
    pub simulated: bool,

    /// Chart image to open in the annotator
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl Cli {
    /// Resolves the flags into startup overrides. Fails if `--image` is not
    /// a readable image.
    pub fn startup_options(&self) -> Result<StartupOptions> {
        let class = if self.simulated {
            InstrumentClass::Simulated
        } else {
            InstrumentClass::Live
        };
        let subscription = match (&self.symbol, self.simulated) {
            (Some(symbol), _) => Some((symbol.trim().to_uppercase(), class)),
            (None, true) => Some((FEED.default_simulated_symbol.to_string(), class)),
            (None, false) => None,
        };

        let image = match &self.image {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let image = EncodedImage::from_file_bytes(bytes)
                    .with_context(|| format!("{} is not a supported image", path.display()))?;
                Some(image)
            }
            None => None,
        };

        Ok(StartupOptions {
            subscription,
            image,
        })
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    engine: AssistantEngine,
    options: StartupOptions,
) -> Box<dyn eframe::App> {
    let app = ui::PatternProApp::new(cc, engine, options);
    Box::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::parse_from(["pattern-pro", "--symbol", "ethusdt"]);
        let options = cli.startup_options().unwrap();
        assert_eq!(
            options.subscription,
            Some(("ETHUSDT".to_string(), InstrumentClass::Live))
        );
        assert!(options.image.is_none());
    }

    #[test]
    fn simulated_without_symbol_uses_default() {
        let cli = Cli::parse_from(["pattern-pro", "--simulated"]);
        let options = cli.startup_options().unwrap();
        assert_eq!(
            options.subscription,
            Some((FEED.default_simulated_symbol.to_string(), InstrumentClass::Simulated))
        );
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let options = Cli::parse_from(["pattern-pro"]).startup_options().unwrap();
        assert!(options.subscription.is_none());
    }

    #[test]
    fn unreadable_image_is_an_error() {
        let cli = Cli::parse_from(["pattern-pro", "--image", "/definitely/not/here.png"]);
        assert!(cli.startup_options().is_err());
    }
}
