use std::sync::Arc;

use crate::analysis::AnalysisError;
use crate::domain::{AgentDecision, AnalysisResult, EncodedImage};

/// Which prompt/schema pair to run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisJob {
    Chart,
    Agent { context: String },
}

/// One analysis for the worker
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub request_id: u64,
    pub job: AnalysisJob,
    // Shared with the result so the UI can show exactly what was sent
    pub image: Arc<EncodedImage>,
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Chart(AnalysisResult),
    Agent(AgentDecision),
}

/// The result returned by the worker
#[derive(Debug)]
pub struct JobResult {
    pub request_id: u64,
    pub duration_ms: u128,
    pub result: Result<AnalysisOutcome, AnalysisError>,
}
