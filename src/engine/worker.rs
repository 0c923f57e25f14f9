use std::sync::mpsc::Sender;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::analysis::AnalysisClient;

use super::messages::{AnalysisJob, AnalysisOutcome, JobRequest, JobResult};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

pub async fn run_job(client: &AnalysisClient, req: &JobRequest) -> JobResult {
    let start = Instant::now();
    let result = match &req.job {
        AnalysisJob::Chart => client
            .analyze_chart(&req.image)
            .await
            .map(|r| AnalysisOutcome::Chart(r.with_source_image(req.image.clone()))),
        AnalysisJob::Agent { context } => client
            .consult_agent(&req.image, context)
            .await
            .map(AnalysisOutcome::Agent),
    };
    JobResult {
        request_id: req.request_id,
        duration_ms: start.elapsed().as_millis(),
        result,
    }
}

/// Runs one request as its own task and posts the outcome back on `tx`.
/// Aborting the handle drops the request mid-flight and nothing is posted.
pub fn spawn_job(
    runtime: &Handle,
    client: AnalysisClient,
    req: JobRequest,
    tx: Sender<JobResult>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_analysis_requests {
            log::info!("[worker] request #{} started", req.request_id);
        }

        let result = run_job(&client, &req).await;
        if let Err(e) = &result.result {
            log::error!("Analysis #{} failed: {}", req.request_id, e);
        }
        // Receiver gone means the engine is shutting down
        let _ = tx.send(result);
    })
}
