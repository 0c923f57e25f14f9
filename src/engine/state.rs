use std::time::Instant;

use crate::domain::{AgentDecision, AnalysisResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Completed,
    /// Carries the user-facing message
    Failed(String),
}

impl AnalysisStatus {
    pub fn label(&self) -> &str {
        match self {
            AnalysisStatus::Idle => "Idle",
            AnalysisStatus::Analyzing => "Analyzing",
            AnalysisStatus::Completed => "Completed",
            AnalysisStatus::Failed(message) => message,
        }
    }
}

/// What the UI reads each frame. Results are replaced wholesale, never edited.
#[derive(Debug, Default)]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    /// The request whose reply we are waiting for (or last accepted)
    pub current_request: Option<u64>,
    pub result: Option<AnalysisResult>,
    pub decision: Option<AgentDecision>,
    pub started_at: Option<Instant>,
    pub last_duration_ms: Option<u128>,
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        self.status == AnalysisStatus::Analyzing
    }

    /// Drops the previous outcome and waits for `request_id`.
    pub fn begin(&mut self, request_id: u64) {
        *self = Self {
            status: AnalysisStatus::Analyzing,
            current_request: Some(request_id),
            started_at: Some(Instant::now()),
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn accepts(&self, request_id: u64) -> bool {
        self.is_analyzing() && self.current_request == Some(request_id)
    }
}
