use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::domain::EncodedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

/// The chart analyst's reply. Field names on the wire follow the declared
/// response schema (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub pattern_name: String,
    /// 0..=100
    pub confidence: f64,
    pub trend: Trend,
    pub support_levels: Vec<String>,
    pub resistance_levels: Vec<String>,
    pub analysis: String,
    pub actionable_advice: String,
    /// The exact image that was sent, attached after a successful reply
    #[serde(skip)]
    pub source_image: Option<Arc<EncodedImage>>,
}

impl AnalysisResult {
    pub fn with_source_image(mut self, image: Arc<EncodedImage>) -> Self {
        self.source_image = Some(image);
        self
    }

    pub fn support_prices(&self) -> Vec<f64> {
        self.support_levels.iter().filter_map(|l| parse_level(l)).collect()
    }

    pub fn resistance_prices(&self) -> Vec<f64> {
        self.resistance_levels.iter().filter_map(|l| parse_level(l)).collect()
    }
}

/// Pulls the first number out of a model-written level such as "$42,150.5"
/// or "~1.0850 (weekly)". Ranges like "100-105" yield the first bound.
pub fn parse_level(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    number.trim_end_matches('.').parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AgentAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedState {
    pub trend: String,
    pub volatility: String,
    pub key_levels: String,
}

/// The agent variant's reply. "Agent" is a label only: the decision comes
/// from the same hosted model as the chart analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDecision {
    pub action: AgentAction,
    /// 0..=100
    pub confidence: f64,
    pub reward_risk_ratio: f64,
    pub suggested_entry: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub reasoning: String,
    pub detected_state: DetectedState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_handles_currency_and_commas() {
        assert_eq!(parse_level("$42,150.5"), Some(42150.5));
        assert_eq!(parse_level("~1.0850 (weekly)"), Some(1.085));
        assert_eq!(parse_level("100-105"), Some(100.0));
        assert_eq!(parse_level("none visible"), None);
    }

    #[test]
    fn result_deserializes_from_schema_field_names() {
        let raw = r#"{
            "patternName": "Bull Flag",
            "confidence": 72,
            "trend": "Bullish",
            "supportLevels": ["100"],
            "resistanceLevels": ["120", "125"],
            "analysis": "Tight flag after impulse.",
            "actionableAdvice": "Wait for breakout."
        }"#;
        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.trend, Trend::Bullish);
        assert_eq!(result.resistance_prices(), vec![120.0, 125.0]);
        assert!(result.source_image.is_none());
    }

    #[test]
    fn agent_action_is_uppercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&AgentAction::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(AgentAction::Sell.to_string(), "SELL");
    }
}
