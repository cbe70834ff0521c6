//! Summary provider configuration.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::SummaryError;

/// Supported chat APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }
}

impl FromStr for Provider {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(SummaryError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Configuration for the summary endpoint. `provider` and `api_key` both
/// have to be present for a summary to be attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name; the provider's default when unset.
    #[serde(default)]
    pub model: Option<String>,
    /// API base URL without the path; the provider's public endpoint when unset.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Language the narrative should be written in.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_language() -> String {
    "English".into()
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            model: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            language: default_language(),
        }
    }
}

impl SummaryConfig {
    /// Fill unset fields from `other`. Fields already set here win.
    pub fn or(self, other: SummaryConfig) -> Self {
        Self {
            provider: self.provider.or(other.provider),
            api_key: self.api_key.or(other.api_key),
            model: self.model.or(other.model),
            base_url: self.base_url.or(other.base_url),
            ..self
        }
    }

    /// Whether both provider and key are present and non-blank.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.provider) && present(&self.api_key)
    }
}
