use reqwest::Client;

use crate::config::Config;
use crate::error::CaptionError;
use crate::request::{CaptionRequest, ChatCompletionResponse};

/// Max bytes of a response body written to the debug log.
const LOG_PREVIEW_BYTES: usize = 500;

pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(config.request_timeout).build()
}

/// Sends one caption request and extracts `choices[0].message.content`.
///
/// Exactly one POST is made; there is no retry.
pub async fn send_caption_request(
    client: &Client,
    config: &Config,
    request: &CaptionRequest,
) -> Result<String, CaptionError> {
    tracing::debug!(url = %config.api_url, model = %request.model, "sending caption request");

    let response = client
        .post(&config.api_url)
        .bearer_auth(&config.api_key)
        .header("HTTP-Referer", &config.site_url)
        .header("X-Title", &config.app_name)
        .json(&request.to_body())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    tracing::debug!(%status, body = preview(&body), "caption API response");

    if !status.is_success() {
        return Err(CaptionError::Status { status, body });
    }

    extract_content(&body)
}

/// Parses a response body and pulls out the caption text.
pub fn extract_content(body: &str) -> Result<String, CaptionError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|source| CaptionError::Decode {
            source,
            raw: body.to_string(),
        })?;

    ChatCompletionResponse::first_content(&value)
        .ok_or(CaptionError::UnexpectedFormat { raw: value })
}

fn preview(body: &str) -> &str {
    if body.len() <= LOG_PREVIEW_BYTES {
        return body;
    }
    let mut end = LOG_PREVIEW_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
