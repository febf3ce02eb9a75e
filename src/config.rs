use std::time::Duration;

use secrecy::SecretString;

use crate::template::DEFAULT_PROMPT_TEMPLATE;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default port when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8002;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const FALLBACK_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Settings for the model client, read once at startup.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub model_identifier: String,
    /// `None` when no credential was provided; initialization then fails.
    pub api_key: Option<SecretString>,
    pub prompt_template: String,
    pub base_url: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_identifier: DEFAULT_MODEL.to_string(),
            api_key: None,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ModelConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let timeout = get("GEMINI_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            model_identifier: get("GEMINI_MODEL").unwrap_or(defaults.model_identifier),
            api_key: get(API_KEY_VAR)
                .or_else(|| get(FALLBACK_API_KEY_VAR))
                .map(SecretString::new),
            prompt_template: get("SUMMARY_PROMPT_TEMPLATE").unwrap_or(defaults.prompt_template),
            base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            api_version: get("GEMINI_API_VERSION").unwrap_or(defaults.api_version),
            timeout,
        }
    }
}

/// Port from the `PORT` environment variable, falling back to [`DEFAULT_PORT`].
pub fn port_from_env() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Whether the `LEGACY_ERROR_PAYLOADS` environment variable is switched on.
pub fn legacy_errors_from_env() -> bool {
    std::env::var("LEGACY_ERROR_PAYLOADS")
        .map(|value| matches!(value.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
