pub mod core;
pub mod messages;
pub mod state;
pub mod worker;

// Re-export key components
pub use core::AssistantEngine;
pub use messages::{AnalysisJob, AnalysisOutcome};
pub use state::{AnalysisState, AnalysisStatus};
