//! Headless analysis: one image file in, the structured reply as JSON out.
//!
//! ```text
//! analyze_chart chart.png
//! analyze_chart chart.png --context "RSI 72, CPI print tomorrow"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pattern_pro::analysis::AnalysisClient;
use pattern_pro::domain::EncodedImage;

#[derive(Parser, Debug)]
#[command(author, version, about = "Analyze a chart image and print the reply as JSON")]
struct Args {
    /// PNG, JPEG, GIF, WebP or BMP chart image
    image: PathBuf,

    /// Consult the agent with this market context instead of the chart analyst
    #[arg(long)]
    context: Option<String>,

    /// Compact single-line JSON
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("pattern_pro"), log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {:?}", args.image))?;
    let image = EncodedImage::from_file_bytes(bytes)
        .with_context(|| format!("{:?} is not a supported image", args.image))?;

    let client = AnalysisClient::from_env().context("Failed to build analysis client")?;

    let value = match &args.context {
        Some(context) => {
            let decision = client
                .consult_agent(&image, context)
                .await
                .context("Agent consultation failed")?;
            serde_json::to_value(decision)?
        }
        None => {
            let result = client
                .analyze_chart(&image)
                .await
                .context("Chart analysis failed")?;
            serde_json::to_value(result)?
        }
    };

    let text = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", text);
    Ok(())
}
