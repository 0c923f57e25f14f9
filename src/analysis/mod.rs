//! Structured chart analysis by a hosted vision model.
pub mod client;
pub mod error;
pub mod prompts;
pub mod schema;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::{AnalysisClient, AnalysisConfig};
pub use error::{ANALYSIS_FAILED_MESSAGE, AnalysisError, ErrorKind};
pub use schema::{AGENT_DECISION, CHART_PATTERN, ResponseSchema, SchemaViolation};
