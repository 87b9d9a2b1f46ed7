//! Caption calls against a stubbed chat-completions endpoint.

use std::io::Write;

use openrouter_captioner::client::build_http_client;
use openrouter_captioner::{caption_file, caption_image, describe_image};
use openrouter_captioner::{CaptionError, CaptionStyle, Config};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1729",
        "model": "meta-llama/llama-3.2-90b-vision-instruct",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn config_for(server: &MockServer) -> Config {
    Config::new("test-api-key", format!("{}/api/v1/chat/completions", server.uri()))
}

#[tokio::test]
async fn returns_content_from_well_formed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("HTTP-Referer", "https://your-site-url.com"))
        .and(header("X-Title", "Image Captioning App"))
        .and(body_partial_json(json!({
            "model": "meta-llama/llama-3.2-90b-vision-instruct"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("X")))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();
    let caption = caption_image(&client, &config, PNG_BYTES, CaptionStyle::Long)
        .await
        .unwrap();
    assert_eq!(caption, "X");
}

#[tokio::test]
async fn sends_selected_style_prompts_and_data_url() {
    let server = MockServer::start().await;
    let (system, user) = CaptionStyle::Scientific.prompts();
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": system },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": user },
                        {
                            "type": "image_url",
                            "image_url": { "url": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAE=" }
                        }
                    ]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();
    let caption = caption_image(&client, &config, PNG_BYTES, CaptionStyle::Scientific)
        .await
        .unwrap();
    assert_eq!(caption, "ok");
}

#[tokio::test]
async fn server_error_becomes_message_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();

    let err = caption_image(&client, &config, PNG_BYTES, CaptionStyle::Short)
        .await
        .unwrap_err();
    match &err {
        CaptionError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    server.verify().await;
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let text = describe_image(&client, &config, PNG_BYTES, CaptionStyle::Short).await;
    assert!(text.starts_with("Error making request:"), "{text}");
}

#[tokio::test]
async fn connection_failure_becomes_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config::new("test-api-key", format!("http://127.0.0.1:{port}/v1"));
    let client = build_http_client(&config).unwrap();

    let err = caption_image(&client, &config, PNG_BYTES, CaptionStyle::Long)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "transport");

    let text = describe_image(&client, &config, PNG_BYTES, CaptionStyle::Long).await;
    assert!(text.starts_with("Error making request:"), "{text}");
}

#[tokio::test]
async fn malformed_json_becomes_decode_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();
    let text = describe_image(&client, &config, PNG_BYTES, CaptionStyle::Long).await;
    assert_eq!(
        text,
        "Error decoding JSON response. Raw response: <html>gateway</html>"
    );
}

#[tokio::test]
async fn missing_choices_becomes_unexpected_format_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": { "message": "model overloaded" } })),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();

    let err = caption_image(&client, &config, PNG_BYTES, CaptionStyle::Long)
        .await
        .unwrap_err();
    assert!(matches!(err, CaptionError::UnexpectedFormat { .. }));

    let text = describe_image(&client, &config, PNG_BYTES, CaptionStyle::Long).await;
    assert!(text.starts_with("Error: Unexpected response format."), "{text}");
    assert!(text.contains("model overloaded"));
}

#[tokio::test]
async fn empty_image_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();
    let err = caption_image(&client, &config, &[], CaptionStyle::Long)
        .await
        .unwrap_err();
    assert!(matches!(err, CaptionError::EmptyImage));
}

#[tokio::test]
async fn captions_image_read_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A red barn.")))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PNG_BYTES).unwrap();
    file.flush().unwrap();

    let config = config_for(&server);
    let client = build_http_client(&config).unwrap();
    let caption = caption_file(&client, &config, file.path(), CaptionStyle::Artistic)
        .await
        .unwrap();
    assert_eq!(caption, "A red barn.");
}

#[tokio::test]
async fn unreadable_file_becomes_read_message() {
    let config = Config::new("test-api-key", "http://127.0.0.1:9/unused");
    let client = build_http_client(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = caption_file(&client, &config, dir.path().join("missing.jpg"), CaptionStyle::Long)
        .await
        .unwrap_err();
    assert!(matches!(err, CaptionError::Io(_)));
    assert!(err.user_message().starts_with("Error reading image:"));
}
