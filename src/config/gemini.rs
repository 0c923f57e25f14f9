//! Hosted vision model configuration.

pub struct GeminiSettings {
    /// REST base (no trailing slash)
    pub base_url: &'static str,
    /// Model used for both the chart analyst and the agent prompts
    pub model: &'static str,
    /// Whole-request timeout
    pub timeout_ms: u64,
    /// Environment variables checked (in order) for the API credential
    pub api_key_env_vars: &'static [&'static str],
    /// Context used for agent consults when the user leaves the box empty
    pub default_agent_context: &'static str,
}

pub const GEMINI: GeminiSettings = GeminiSettings {
    base_url: "https://generativelanguage.googleapis.com",
    model: "gemini-2.5-flash",
    timeout_ms: 60_000,
    api_key_env_vars: &["GEMINI_API_KEY", "API_KEY"],
    default_agent_context: "Standard market conditions",
};
