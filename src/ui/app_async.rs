use std::time::Duration;

use poll_promise::Promise;

use crate::chart::{SynthesizedChart, synthesize_chart};
use crate::config::WatchlistItem;
use crate::data::candles::{CandleRequest, default_sources};
use crate::ui::app::PatternProApp;
use crate::utils::app_time::now;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

pub(super) struct ChartSynthesisResult {
    pub(super) ticker: String,
    pub(super) result: Result<SynthesizedChart, String>,
    elapsed_time: Duration,
}

impl PatternProApp {
    /// One synthesis at a time; further clicks are ignored until it lands.
    pub(super) fn start_chart_synthesis(&mut self, item: &WatchlistItem) {
        if self.chart_promise.is_some() {
            return;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Synthesizing chart for {} ({})", item.ticker, item.market);
        }

        let request = CandleRequest::new(item.ticker, item.market, item.reference_price);
        let handle = self.engine.runtime();
        let ticker = item.ticker.to_string();

        let promise = Promise::spawn_thread("chart_synthesis", move || {
            let start = now();
            let sources = default_sources();
            let result = handle
                .block_on(synthesize_chart(&sources, &request))
                .map_err(|e| format!("{:#}", e));
            ChartSynthesisResult {
                ticker,
                result,
                elapsed_time: start.elapsed(),
            }
        });

        self.chart_promise = Some(promise);
    }

    pub(super) fn poll_chart_synthesis(&mut self) {
        let ready = self
            .chart_promise
            .as_ref()
            .is_some_and(|promise| promise.ready().is_some());
        if !ready {
            return;
        }
        let Some(promise) = self.chart_promise.take() else {
            return;
        };
        let Ok(outcome) = promise.try_take() else {
            return;
        };

        match outcome.result {
            Ok(chart) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_candle_sources {
                    log::info!(
                        "Chart for {} from {} ({} candles) in {:?}",
                        outcome.ticker,
                        chart.source,
                        chart.candles.len(),
                        outcome.elapsed_time
                    );
                }
                #[cfg(not(debug_assertions))]
                let _ = outcome.elapsed_time;

                self.load_image(chart.image, Some(chart.candles));
            }
            Err(msg) => {
                log::error!("Chart synthesis for {} failed: {}", outcome.ticker, msg);
                self.last_error = Some(msg);
            }
        }
    }
}
