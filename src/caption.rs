use std::path::Path;
use std::time::Instant;

use reqwest::Client;

use crate::client::send_caption_request;
use crate::config::Config;
use crate::encoder::{guess_mime, read_image, to_data_url};
use crate::error::CaptionError;
use crate::request::CaptionRequest;
use crate::style::CaptionStyle;

/// Encodes the image, selects the prompts for `style` and runs the request.
pub async fn caption_image(
    client: &Client,
    config: &Config,
    image: &[u8],
    style: CaptionStyle,
) -> Result<String, CaptionError> {
    let start = Instant::now();
    let data_url = to_data_url(image)?;
    let request = CaptionRequest::new(&config.model, style, data_url);

    tracing::info!(
        %style,
        bytes = image.len(),
        mime = guess_mime(image),
        "requesting caption"
    );

    let caption = send_caption_request(client, config, &request).await?;

    tracing::info!(
        %style,
        elapsed_ms = start.elapsed().as_millis() as u64,
        chars = caption.chars().count(),
        "caption generated"
    );
    Ok(caption)
}

/// Same as [`caption_image`] but reads the image from a file first.
pub async fn caption_file(
    client: &Client,
    config: &Config,
    path: impl AsRef<Path>,
    style: CaptionStyle,
) -> Result<String, CaptionError> {
    let image = read_image(path).await?;
    caption_image(client, config, &image, style).await
}

/// Logs a failed caption call and returns the text shown to the user.
pub fn report_failure(err: &CaptionError, style: CaptionStyle) -> String {
    if err.is_client_error() {
        tracing::warn!(kind = err.kind(), %style, error = %err, "caption rejected");
    } else {
        tracing::error!(kind = err.kind(), %style, error = %err, "caption failed");
    }
    err.user_message()
}

/// Always produces text: the caption, or a readable error message.
pub async fn describe_image(
    client: &Client,
    config: &Config,
    image: &[u8],
    style: CaptionStyle,
) -> String {
    match caption_image(client, config, image, style).await {
        Ok(caption) => caption,
        Err(err) => report_failure(&err, style),
    }
}
