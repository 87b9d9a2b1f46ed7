use reqwest::StatusCode;
use thiserror::Error;

/// Startup failures. These are fatal: the server never binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Per-request failures. None of these take the process down; the caption
/// boundary logs them and turns them into a readable message.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("image is empty")]
    EmptyImage,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("response is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
    #[error("response has no choices[0].message.content")]
    UnexpectedFormat { raw: serde_json::Value },
}

impl CaptionError {
    /// Stable tag for the failure class, exposed to HTTP callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::EmptyImage => "empty_image",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
            Self::UnexpectedFormat { .. } => "unexpected_format",
        }
    }

    /// True when the caller supplied a bad image rather than the upstream failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::EmptyImage)
    }

    /// The message shown to the user in place of a caption.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Error reading image: {e}"),
            Self::EmptyImage => "Error reading image: the uploaded file is empty".to_string(),
            Self::Transport(e) => format!("Error making request: {e}"),
            Self::Status { status, body } => {
                format!("Error making request: {status} from API: {body}")
            }
            Self::Decode { raw, .. } => {
                format!("Error decoding JSON response. Raw response: {raw}")
            }
            Self::UnexpectedFormat { raw } => {
                let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
                format!("Error: Unexpected response format. Full response: {pretty}")
            }
        }
    }
}
