use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.2-90b-vision-instruct";
pub const DEFAULT_SITE_URL: &str = "https://your-site-url.com";
pub const DEFAULT_APP_NAME: &str = "Image Captioning App";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Configuration read once from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub site_url: String,
    pub app_name: String,
    pub api_url: String,
    pub model: String,
    pub bind_addr: String,
    pub request_timeout: Duration,
    pub max_concurrent: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENROUTER_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            site_url: get("CAPTION_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            app_name: get("CAPTION_APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            api_url: get("CAPTION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: get("CAPTION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind_addr: get("CAPTION_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            request_timeout: Duration::from_secs(positive(
                "CAPTION_REQUEST_TIMEOUT_SECS",
                get("CAPTION_REQUEST_TIMEOUT_SECS"),
                120,
            )?),
            max_concurrent: positive("CAPTION_MAX_CONCURRENT", get("CAPTION_MAX_CONCURRENT"), 4)?
                as usize,
            max_upload_bytes: positive(
                "CAPTION_MAX_UPLOAD_BYTES",
                get("CAPTION_MAX_UPLOAD_BYTES"),
                10 * 1024 * 1024,
            )? as usize,
        })
    }

    /// Minimal config pointing at `api_url`, used by tests and local tooling.
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            api_url: api_url.into(),
            model: DEFAULT_MODEL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            request_timeout: Duration::from_secs(120),
            max_concurrent: 4,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn positive(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid { var, value: raw }),
        },
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("site_url", &self.site_url)
            .field("app_name", &self.app_name)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout", &self.request_timeout)
            .field("max_concurrent", &self.max_concurrent)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
