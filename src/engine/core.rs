use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

use crate::analysis::AnalysisClient;
use crate::data::feed::{FeedConfig, FeedConnector};
use crate::domain::{ConnectionState, EncodedImage, InstrumentClass, MarketTick};

use super::messages::{AnalysisJob, AnalysisOutcome, JobRequest, JobResult};
use super::state::{AnalysisState, AnalysisStatus};
use super::worker;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

pub struct AssistantEngine {
    /// Live ticker for the market widget
    feed: FeedConnector,

    /// Worker Communication
    client: AnalysisClient,
    result_tx: Sender<JobResult>,
    result_rx: Receiver<JobResult>,
    /// At most one request runs; a new submit or a discard aborts it.
    in_flight: Option<JoinHandle<()>>,
    next_request_id: u64,
    has_api_key: bool,

    pub analysis: AnalysisState,

    /// Drives sockets, timers and HTTP. Declared last so it outlives the feed.
    runtime: Arc<Runtime>,
}

impl AssistantEngine {
    pub fn new(runtime: Arc<Runtime>, client: AnalysisClient) -> Self {
        Self::with_feed_config(runtime, client, FeedConfig::default())
    }

    pub fn with_feed_config(runtime: Arc<Runtime>, client: AnalysisClient, feed_config: FeedConfig) -> Self {
        let has_api_key = client.config().api_key.is_some();
        let (result_tx, result_rx) = channel::<JobResult>();

        Self {
            feed: FeedConnector::with_config(runtime.handle().clone(), feed_config),
            runtime,
            client,
            result_tx,
            result_rx,
            in_flight: None,
            next_request_id: 0,
            has_api_key,
            analysis: AnalysisState::default(),
        }
    }

    /// Call once per frame. Returns TRUE while something is in flight
    /// (analysis running or feed live), so the UI keeps repainting.
    pub fn update(&mut self) -> bool {
        let ticks = self.feed.poll();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_feed_ticks && ticks > 0 {
            if let Some(tick) = self.feed.latest_tick() {
                log::info!("[feed] {} tick(s), last {} @ {}", ticks, tick.symbol, tick.price);
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = ticks;

        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_job_result(result);
        }

        self.analysis.is_analyzing() || self.feed.state() != ConnectionState::Disconnected
    }

    /// Without a key every submission fails fast; the UI warns up front.
    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    pub fn runtime(&self) -> Handle {
        self.runtime.handle().clone()
    }

    // --- FEED ---

    pub fn subscribe(&mut self, symbol: &str, instrument_class: InstrumentClass) {
        self.feed.subscribe(symbol, instrument_class);
    }

    pub fn unsubscribe(&mut self) {
        self.feed.unsubscribe();
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.feed.state()
    }

    pub fn latest_tick(&self) -> Option<&MarketTick> {
        self.feed.latest_tick()
    }

    pub fn subscribed_symbol(&self) -> Option<(&str, InstrumentClass)> {
        self.feed
            .subscription()
            .map(|s| (s.symbol(), s.instrument_class()))
    }

    // --- ANALYSIS ---

    pub fn submit_chart_analysis(&mut self, image: EncodedImage) -> u64 {
        self.submit(AnalysisJob::Chart, image)
    }

    pub fn submit_agent_consult(&mut self, image: EncodedImage, context: &str) -> u64 {
        self.submit(
            AnalysisJob::Agent {
                context: context.to_string(),
            },
            image,
        )
    }

    /// Back to Idle. The request in flight is aborted; a reply that already
    /// landed in the channel is dropped as stale.
    pub fn discard_analysis(&mut self) {
        self.abort_in_flight();
        self.analysis.reset();
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_analysis_requests {
                    log::info!("[engine] aborting request in flight");
                }
                handle.abort();
            }
        }
    }

    fn submit(&mut self, job: AnalysisJob, image: EncodedImage) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.analysis.begin(request_id);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_analysis_requests {
            log::info!("[engine] submitting #{} ({:?})", request_id, job);
        }

        self.abort_in_flight();
        let req = JobRequest {
            request_id,
            job,
            image: Arc::new(image),
        };
        self.in_flight = Some(worker::spawn_job(
            self.runtime.handle(),
            self.client.clone(),
            req,
            self.result_tx.clone(),
        ));
        request_id
    }

    fn handle_job_result(&mut self, result: JobResult) {
        if !self.analysis.accepts(result.request_id) {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_analysis_requests {
                log::info!("[engine] dropping stale reply #{}", result.request_id);
            }
            return;
        }
        self.in_flight = None;
        self.analysis.last_duration_ms = Some(result.duration_ms);
        match result.result {
            Ok(AnalysisOutcome::Chart(r)) => {
                self.analysis.result = Some(r);
                self.analysis.status = AnalysisStatus::Completed;
            }
            Ok(AnalysisOutcome::Agent(d)) => {
                self.analysis.decision = Some(d);
                self.analysis.status = AnalysisStatus::Completed;
            }
            Err(e) => {
                self.analysis.status = AnalysisStatus::Failed(e.user_message().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_server::{pattern_reply, spawn_delayed_stub};
    use crate::analysis::{ANALYSIS_FAILED_MESSAGE, AnalysisConfig};
    use crate::data::feed::SimulatedParams;
    use image::{Rgba, RgbaImage};
    use std::time::{Duration, Instant};

    fn engine(api_key: Option<&str>) -> AssistantEngine {
        engine_against(Arc::new(Runtime::new().unwrap()), "http://127.0.0.1:9", api_key)
    }

    fn engine_against(runtime: Arc<Runtime>, base_url: &str, api_key: Option<&str>) -> AssistantEngine {
        let config = AnalysisConfig {
            api_key: api_key.map(str::to_string),
            ..AnalysisConfig::default()
        }
        .with_base_url(base_url);
        let feed_config = FeedConfig {
            simulated: SimulatedParams {
                tick_interval: Duration::from_millis(5),
                ..SimulatedParams::default()
            },
            ..FeedConfig::default()
        };
        AssistantEngine::with_feed_config(runtime, AnalysisClient::new(config).unwrap(), feed_config)
    }

    fn image() -> EncodedImage {
        EncodedImage::encode_png(&RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))).unwrap()
    }

    fn pump_until(engine: &mut AssistantEngine, mut done: impl FnMut(&AssistantEngine) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            engine.update();
            if done(engine) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn failed_analysis_reports_stable_message() {
        let mut engine = engine(None);
        engine.submit_chart_analysis(image());
        assert!(engine.analysis.is_analyzing());
        assert!(pump_until(&mut engine, |e| !e.analysis.is_analyzing()));
        assert_eq!(
            engine.analysis.status,
            AnalysisStatus::Failed(ANALYSIS_FAILED_MESSAGE.to_string())
        );
        assert!(engine.analysis.result.is_none());
    }

    #[test]
    fn discarded_request_is_ignored() {
        let mut engine = engine(None);
        engine.submit_agent_consult(image(), "");
        engine.discard_analysis();
        std::thread::sleep(Duration::from_millis(100));
        engine.update();
        assert_eq!(engine.analysis.status, AnalysisStatus::Idle);
        assert!(!engine.update());
    }

    #[test]
    fn resubmission_supersedes_earlier_request() {
        let mut engine = engine(None);
        let first = engine.submit_chart_analysis(image());
        let second = engine.submit_chart_analysis(image());
        assert!(second > first);
        assert_eq!(engine.analysis.current_request, Some(second));
        assert!(pump_until(&mut engine, |e| !e.analysis.is_analyzing()));
        assert!(matches!(engine.analysis.status, AnalysisStatus::Failed(_)));
    }

    #[test]
    fn feed_ticks_flow_through_update() {
        let mut engine = engine(None);
        engine.subscribe("TCS", InstrumentClass::Simulated);
        assert!(pump_until(&mut engine, |e| e.latest_tick().is_some()));
        assert_eq!(engine.connection_state(), ConnectionState::Connected);
        assert_eq!(engine.subscribed_symbol(), Some(("TCS", InstrumentClass::Simulated)));

        engine.unsubscribe();
        assert_eq!(engine.connection_state(), ConnectionState::Disconnected);
        assert!(engine.latest_tick().is_none());
    }

    #[test]
    fn api_key_presence_is_reported() {
        assert!(!engine(None).has_api_key());
        assert!(engine(Some("k")).has_api_key());
    }

    #[test]
    fn discarded_request_does_not_hold_up_the_next_one() {
        let runtime = Arc::new(Runtime::new().unwrap());
        let delay = Duration::from_millis(2000);
        let url = spawn_delayed_stub(&runtime, delay, pattern_reply());
        let mut engine = engine_against(runtime, &url, Some("k"));

        engine.submit_chart_analysis(image());
        std::thread::sleep(Duration::from_millis(300));
        engine.discard_analysis();

        let started = Instant::now();
        let id = engine.submit_chart_analysis(image());
        assert!(pump_until(&mut engine, |e| !e.analysis.is_analyzing()));
        let elapsed = started.elapsed();

        assert_eq!(engine.analysis.status, AnalysisStatus::Completed);
        assert_eq!(engine.analysis.current_request, Some(id));
        assert!(
            elapsed < delay + Duration::from_millis(600),
            "fresh request took {:?}",
            elapsed
        );
    }

    #[test]
    fn superseded_request_is_aborted() {
        let runtime = Arc::new(Runtime::new().unwrap());
        let delay = Duration::from_millis(1000);
        let url = spawn_delayed_stub(&runtime, delay, pattern_reply());
        let mut engine = engine_against(runtime, &url, Some("k"));

        engine.submit_chart_analysis(image());
        std::thread::sleep(Duration::from_millis(300));
        let started = Instant::now();
        let second = engine.submit_chart_analysis(image());
        assert!(pump_until(&mut engine, |e| !e.analysis.is_analyzing()));

        assert_eq!(engine.analysis.current_request, Some(second));
        assert_eq!(engine.analysis.status, AnalysisStatus::Completed);
        let result = engine.analysis.result.as_ref().unwrap();
        assert_eq!(result.pattern_name, "Ascending Triangle");
        assert!(started.elapsed() < delay + Duration::from_millis(600));
    }
}
