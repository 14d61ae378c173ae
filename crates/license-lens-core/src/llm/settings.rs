use anyhow::{Context, Result};
use std::collections::HashMap;

/// Process-wide model backend configuration. Constructed once at startup and
/// passed by reference into client constructors; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub provider: String,
    pub api_key: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ModelSettings {
    pub const PROVIDER_ENV: &'static str = "LICENSE_LENS_PROVIDER";
    pub const API_KEY_ENV: &'static str = "LICENSE_LENS_API_KEY";
    pub const ENDPOINT_ENV: &'static str = "LICENSE_LENS_ENDPOINT";
    pub const MODEL_ENV: &'static str = "LICENSE_LENS_MODEL";
    pub const TIMEOUT_ENV: &'static str = "LICENSE_LENS_TIMEOUT_SECS";

    /// Load settings from environment variables.
    ///
    /// * `LICENSE_LENS_PROVIDER` — Provider identifier (default: `gemini`).
    /// * `LICENSE_LENS_API_KEY`  — API key/token (required except for `canned`).
    /// * `LICENSE_LENS_ENDPOINT` — Optional custom endpoint/base URL.
    /// * `LICENSE_LENS_MODEL`    — Optional model identifier override.
    /// * `LICENSE_LENS_TIMEOUT_SECS` — Optional request timeout.
    pub fn from_env() -> Result<Self> {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        let provider = vars
            .get(Self::PROVIDER_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "gemini".to_string())
            .trim()
            .to_string();
        let provider_lower = provider.to_lowercase();
        let api_key = match provider_lower.as_str() {
            "canned" => vars.get(Self::API_KEY_ENV).cloned().unwrap_or_default(),
            _ => vars
                .get(Self::API_KEY_ENV)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .with_context(|| {
                    format!("environment variable {} must be set", Self::API_KEY_ENV)
                })?,
        };
        let endpoint = vars
            .get(Self::ENDPOINT_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let model = vars
            .get(Self::MODEL_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            provider,
            api_key,
            endpoint,
            model,
            timeout_secs,
        })
    }
}
