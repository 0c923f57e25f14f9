//! Feed subscriptions as owned resources.
//!
//! `Subscription` is what a single `subscribe` produces: one tokio task, one
//! tick channel, one status cell. Dropping it (or calling `teardown`) stops
//! the task and discards anything still queued. `FeedConnector` is the
//! per-widget handle that holds at most one `Subscription` at a time.

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::BINANCE;
use crate::domain::{ConnectionState, InstrumentClass, MarketTick};

use super::live::{build_stream_url, run_live_stream};
use super::simulated::{SimulatedMarket, SimulatedParams, run_simulated_feed};
use super::sink::{SharedStatus, StatusCell, TickSink, lock_status};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket base, e.g. `wss://stream.binance.com:9443/ws`
    pub ws_base_url: String,
    pub ticker_stream: String,
    pub simulated: SimulatedParams,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_base_url: BINANCE.ws.base_url.to_string(),
            ticker_stream: BINANCE.ws.ticker_stream.to_string(),
            simulated: SimulatedParams::default(),
        }
    }
}

pub struct Subscription {
    symbol: String,
    instrument_class: InstrumentClass,
    status: StatusCell,
    ticks: Option<Receiver<MarketTick>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Starts the source for `symbol` on `runtime`. State begins at Connecting.
    pub fn open(
        runtime: &Handle,
        config: &FeedConfig,
        symbol: &str,
        instrument_class: InstrumentClass,
    ) -> Self {
        let status: StatusCell = Arc::new(Mutex::new(SharedStatus {
            state: ConnectionState::Connecting,
            cancelled: false,
        }));
        let (tx, rx) = mpsc::channel();
        let sink = TickSink::new(status.clone(), tx);

        let task = match instrument_class {
            InstrumentClass::Live => {
                let url = build_stream_url(&config.ws_base_url, symbol, &config.ticker_stream);
                runtime.spawn(run_live_stream(url, sink))
            }
            InstrumentClass::Simulated => {
                let market = SimulatedMarket::from_entropy(symbol, config.simulated.clone());
                runtime.spawn(run_simulated_feed(
                    market,
                    config.simulated.tick_interval,
                    sink,
                ))
            }
        };

        Self {
            symbol: symbol.to_string(),
            instrument_class,
            status,
            ticks: Some(rx),
            task: Some(task),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn instrument_class(&self) -> InstrumentClass {
        self.instrument_class
    }

    pub fn state(&self) -> ConnectionState {
        lock_status(&self.status).state
    }

    pub fn is_torn_down(&self) -> bool {
        self.task.is_none()
    }

    /// Next queued tick, if any. Always None after teardown.
    pub fn try_next(&self) -> Option<MarketTick> {
        self.ticks.as_ref()?.try_recv().ok()
    }

    /// Blocking variant for headless callers. Do not call from the UI thread.
    pub fn next_timeout(&self, timeout: Duration) -> Option<MarketTick> {
        self.ticks.as_ref()?.recv_timeout(timeout).ok()
    }

    /// Stops the source and drops every undelivered tick. Safe to repeat.
    pub fn teardown(&mut self) {
        {
            let mut status = lock_status(&self.status);
            status.cancelled = true;
            status.state = ConnectionState::Disconnected;
        }
        if let Some(task) = self.task.take() {
            task.abort();

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_feed_lifecycle {
                log::info!("[feed] {} ({}) torn down", self.symbol, self.instrument_class);
            }
        }
        self.ticks = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One widget's feed: at most one live subscription, replaced wholesale on
/// every `subscribe`.
pub struct FeedConnector {
    runtime: Handle,
    config: FeedConfig,
    active: Option<Subscription>,
    latest: Option<MarketTick>,
}

impl FeedConnector {
    pub fn new(runtime: Handle) -> Self {
        Self::with_config(runtime, FeedConfig::default())
    }

    pub fn with_config(runtime: Handle, config: FeedConfig) -> Self {
        Self {
            runtime,
            config,
            active: None,
            latest: None,
        }
    }

    /// Tears down the current subscription (if any) before opening the next,
    /// so two sources never run for the same widget.
    pub fn subscribe(&mut self, symbol: &str, instrument_class: InstrumentClass) -> &Subscription {
        self.unsubscribe();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_feed_lifecycle {
            log::info!("[feed] subscribing {} ({})", symbol, instrument_class);
        }

        self.active
            .insert(Subscription::open(&self.runtime, &self.config, symbol, instrument_class))
    }

    /// Releases the transport/timer. Safe before any subscribe and when repeated.
    pub fn unsubscribe(&mut self) {
        if let Some(mut subscription) = self.active.take() {
            subscription.teardown();
        }
        self.latest = None;
    }

    pub fn state(&self) -> ConnectionState {
        self.active
            .as_ref()
            .map(Subscription::state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.active.as_ref()
    }

    /// Pulls everything queued on the current subscription, in generation
    /// order, and remembers the last one. Returns how many arrived.
    pub fn poll(&mut self) -> usize {
        let Some(subscription) = self.active.as_ref() else {
            return 0;
        };
        let mut received = 0;
        while let Some(tick) = subscription.try_next() {
            self.latest = Some(tick);
            received += 1;
        }
        received
    }

    /// Most recent tick of the current subscription. Cleared on resubscribe.
    pub fn latest_tick(&self) -> Option<&MarketTick> {
        self.latest.as_ref()
    }
}

impl Drop for FeedConnector {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
