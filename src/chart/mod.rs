//! Chart synthesis: candles in, analysable PNG out.
pub mod render;

use anyhow::{Context, Result};

use crate::data::candles::{CandleRequest, CandleSource, get_candles_async};
use crate::domain::{Candle, EncodedImage};

pub use render::{ChartLayout, render_chart, render_chart_rgba};

pub struct SynthesizedChart {
    pub image: EncodedImage,
    /// The series the image was drawn from, oldest first
    pub candles: Vec<Candle>,
    /// Signature of the source that supplied the candles
    pub source: &'static str,
}

/// Fetches candles through `sources` (first success wins) and renders them.
pub async fn synthesize_chart(
    sources: &[Box<dyn CandleSource>],
    request: &CandleRequest,
) -> Result<SynthesizedChart> {
    let (candles, source) = get_candles_async(sources, request).await?;
    let image = render_chart(&request.symbol.name, &candles)
        .with_context(|| format!("rendering chart for {}", request.symbol))?;
    Ok(SynthesizedChart {
        image,
        candles,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CHART;
    use crate::data::candles::SyntheticCandles;
    use crate::domain::MarketType;

    #[test]
    fn synthesized_chart_is_full_size_png() {
        let sources: Vec<Box<dyn CandleSource>> = vec![Box::new(SyntheticCandles::seeded(3))];
        let request = CandleRequest::new("EUR/USD", MarketType::Forex, 1.0854);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let chart = rt.block_on(synthesize_chart(&sources, &request)).unwrap();
        assert_eq!(chart.source, "Synthetic");
        assert_eq!(chart.candles.len(), CHART.candle_count);
        assert_eq!(chart.image.mime_type, "image/png");
        assert_eq!(chart.image.dimensions().unwrap(), (CHART.width, CHART.height));
    }
}
