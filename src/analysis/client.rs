//! Gemini `generateContent` client.
//!
//! One request per analysis: inline image + instruction, constrained by a
//! declared response schema. No retry, no caching.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GEMINI;
use crate::domain::{AgentDecision, AnalysisResult, EncodedImage};

use super::error::AnalysisError;
use super::prompts;
use super::schema::{AGENT_DECISION, CHART_PATTERN, ResponseSchema};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let api_key = GEMINI
            .api_key_env_vars
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            base_url: GEMINI.base_url.to_string(),
            model: GEMINI.model.to_string(),
            timeout: Duration::from_millis(GEMINI.timeout_ms),
        }
    }
}

impl AnalysisConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

fn build_request<'a>(
    image: &'a EncodedImage,
    prompt: &'a str,
    schema: &ResponseSchema,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: [Content {
            parts: [
                Part::Inline {
                    inline_data: InlineData {
                        mime_type: &image.mime_type,
                        data: image.to_base64(),
                    },
                },
                Part::Text { text: prompt },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema.to_json(),
        },
    }
}

/// Concatenated text parts of the first candidate.
fn reply_text(body: &str) -> Result<String, AnalysisError> {
    if body.trim().is_empty() {
        return Err(AnalysisError::EmptyReply);
    }
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyReply);
    }
    Ok(text)
}

#[derive(Clone)]
pub struct AnalysisClient {
    config: AnalysisConfig,
    http: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pattern-pro/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::new(AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn analyze_chart(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError> {
        let value = self.generate(image, prompts::CHART_ANALYST, &CHART_PATTERN).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Agent variant. Empty `context` falls back to the configured default.
    pub async fn consult_agent(
        &self,
        image: &EncodedImage,
        context: &str,
    ) -> Result<AgentDecision, AnalysisError> {
        let context = match context.trim() {
            "" => GEMINI.default_agent_context,
            trimmed => trimmed,
        };
        let prompt = prompts::agent_prompt(context);
        let value = self.generate(image, &prompt, &AGENT_DECISION).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Sends the request and returns the schema-validated reply object.
    async fn generate(
        &self,
        image: &EncodedImage,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, AnalysisError> {
        // Both checks happen before any network I/O
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::MissingApiKey)?;
        if image.bytes.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }

        let request = build_request(image, prompt, schema);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_analysis_requests {
            log::info!(
                "[analysis] {} v{}: {} ({} bytes of {}) -> {}",
                schema.name,
                schema.version,
                self.config.model,
                image.bytes.len(),
                image.mime_type,
                self.config.endpoint()
            );
        }

        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let text = reply_text(&body)?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_analysis_raw_reply {
            log::info!("[analysis] raw reply: {}", text);
        }

        let value: Value = serde_json::from_str(text.trim())?;
        schema
            .validate(&value)
            .map_err(|violation| AnalysisError::Schema {
                schema: schema.name,
                version: schema.version,
                violation,
            })?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::{ANALYSIS_FAILED_MESSAGE, ErrorKind};
    use crate::annotate::AnnotationCanvas;
    use crate::domain::{AgentAction, Trend};
    use image::{Rgba, RgbaImage};
    use crate::analysis::test_server::{gemini_reply, pattern_reply, spawn_stub};
    use serde_json::json;
    use tokio::runtime::Runtime;

    fn client_for(base_url: &str) -> AnalysisClient {
        let config = AnalysisConfig {
            api_key: None,
            ..AnalysisConfig::default()
        }
        .with_api_key("test-key")
        .with_base_url(base_url);
        AnalysisClient::new(config).unwrap()
    }

    fn sample_image() -> EncodedImage {
        EncodedImage::encode_png(&RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]))).unwrap()
    }

    #[test]
    fn endpoint_follows_generate_content_layout() {
        let config = AnalysisConfig::default().with_base_url("https://example.test/");
        assert_eq!(
            config.endpoint(),
            format!("https://example.test/v1beta/models/{}:generateContent", GEMINI.model)
        );
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let rt = Runtime::new().unwrap();
        let config = AnalysisConfig {
            api_key: None,
            ..AnalysisConfig::default()
        }
        // Nothing listens here; a request would fail with a transport error instead
        .with_base_url("http://127.0.0.1:9");
        let client = AnalysisClient::new(config).unwrap();
        let err = rt.block_on(client.analyze_chart(&sample_image())).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingApiKey));
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn unparsable_reply_surfaces_the_stable_message() {
        let rt = Runtime::new().unwrap();
        let (url, _) = spawn_stub(&rt, 200, gemini_reply("I think it is a flag, maybe?"));
        let err = rt
            .block_on(client_for(&url).analyze_chart(&sample_image()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn schema_violation_is_rejected() {
        let rt = Runtime::new().unwrap();
        let bad = json!({
            "patternName": "Flag", "confidence": 50, "trend": "Sideways",
            "supportLevels": [], "resistanceLevels": [], "analysis": "", "actionableAdvice": ""
        });
        let (url, _) = spawn_stub(&rt, 200, gemini_reply(&bad.to_string()));
        let err = rt
            .block_on(client_for(&url).analyze_chart(&sample_image()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Schema { schema: "chart_pattern", .. }));
    }

    #[test]
    fn non_success_status_is_a_transport_error() {
        let rt = Runtime::new().unwrap();
        let (url, _) = spawn_stub(&rt, 503, r#"{"error":{"message":"overloaded"}}"#.into());
        let err = rt
            .block_on(client_for(&url).analyze_chart(&sample_image()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Status { status: 503, .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn empty_body_is_a_transport_error() {
        let rt = Runtime::new().unwrap();
        let (url, _) = spawn_stub(&rt, 200, String::new());
        let err = rt
            .block_on(client_for(&url).analyze_chart(&sample_image()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyReply));
    }

    #[test]
    fn unannotated_image_reaches_the_model_pixel_identical() {
        let rt = Runtime::new().unwrap();
        let mut original = RgbaImage::new(400, 300);
        for (x, y, p) in original.enumerate_pixels_mut() {
            *p = Rgba([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 128, 255]);
        }
        let loaded = EncodedImage::encode_png(&original).unwrap();
        let exported = AnnotationCanvas::load(&loaded).unwrap().export_png().unwrap();

        let (url, captured) = spawn_stub(&rt, 200, pattern_reply());
        let result = rt
            .block_on(client_for(&url).analyze_chart(&exported))
            .unwrap();
        assert_eq!(result.pattern_name, "Ascending Triangle");
        assert_eq!(result.trend, Trend::Bullish);
        // Low confidence is a normal success
        assert_eq!(result.confidence, 12.0);

        let captured = rt.block_on(captured).unwrap();
        assert!(captured.head.starts_with("POST /v1beta/models/"));
        assert!(captured.head.contains(":generateContent"));
        assert!(captured.head.to_ascii_lowercase().contains("x-goog-api-key: test-key"));

        let body: Value = serde_json::from_slice(&captured.body).unwrap();
        let inline = &body["contents"][0]["parts"][0]["inlineData"];
        assert_eq!(inline["mimeType"], "image/png");
        let sent = EncodedImage::from_base64(inline["data"].as_str().unwrap()).unwrap();
        assert_eq!(sent.decode_rgba().unwrap(), original);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn agent_consult_uses_default_context() {
        let rt = Runtime::new().unwrap();
        let decision = json!({
            "action": "HOLD", "confidence": 55, "rewardRiskRatio": 1.2,
            "suggestedEntry": "n/a", "stopLoss": "95", "takeProfit": "108",
            "reasoning": "Range bound.",
            "detectedState": { "trend": "Sideways", "volatility": "Low", "keyLevels": "95 / 108" }
        });
        let (url, captured) = spawn_stub(&rt, 200, gemini_reply(&decision.to_string()));
        let result = rt
            .block_on(client_for(&url).consult_agent(&sample_image(), "   "))
            .unwrap();
        assert_eq!(result.action, AgentAction::Hold);
        assert_eq!(result.detected_state.key_levels, "95 / 108");

        let captured = rt.block_on(captured).unwrap();
        let body: Value = serde_json::from_slice(&captured.body).unwrap();
        let prompt = body["contents"][0]["parts"][1]["text"].as_str().unwrap();
        assert!(prompt.contains(GEMINI.default_agent_context));
    }
}
