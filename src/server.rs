use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use reqwest::Client;
use serde::Serialize;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::caption::{caption_image, report_failure};
use crate::config::Config;
use crate::style::CaptionStyle;

pub struct AppState {
    pub config: Config,
    pub http: Client,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub caption: String,
    pub style: CaptionStyle,
    pub model: String,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StyleInfo {
    pub id: &'static str,
    pub label: &'static str,
}

fn error_response(status: StatusCode, kind: &'static str, error: String) -> Response {
    (status, Json(ErrorResponse { error, kind })).into_response()
}

fn multipart_error(err: MultipartError) -> Response {
    tracing::warn!(error = %err, "rejected multipart upload");
    error_response(err.status(), "bad_upload", err.body_text())
}

pub fn router(state: Arc<AppState>) -> Router {
    let max_concurrent = state.config.max_concurrent;
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/styles", get(styles))
        .route(
            "/caption",
            post(caption_upload).layer(ConcurrencyLimitLayer::new(max_concurrent)),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn styles() -> Json<Vec<StyleInfo>> {
    Json(
        CaptionStyle::ALL
            .into_iter()
            .map(|style| StyleInfo {
                id: style.id(),
                label: style.label(),
            })
            .collect(),
    )
}

/// POST /caption - multipart with `image` and optional `style` fields.
async fn caption_upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let start = Instant::now();
    let mut image = None;
    let mut style_id = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return multipart_error(err),
        };
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => match field.bytes().await {
                Ok(bytes) => image = Some(bytes),
                Err(err) => return multipart_error(err),
            },
            Some("style") => match field.text().await {
                Ok(text) => style_id = Some(text),
                Err(err) => return multipart_error(err),
            },
            other => tracing::debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let style = match style_id.as_deref().map(str::parse::<CaptionStyle>) {
        None => CaptionStyle::default(),
        Some(Ok(style)) => style,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "rejected caption request");
            return error_response(StatusCode::BAD_REQUEST, "unknown_style", err.to_string());
        }
    };

    let Some(image) = image else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing_image",
            "no image field in upload".to_string(),
        );
    };

    match caption_image(&state.http, &state.config, &image, style).await {
        Ok(caption) => Json(CaptionResponse {
            caption,
            style,
            model: state.config.model.clone(),
            processing_time_ms: start.elapsed().as_millis(),
        })
        .into_response(),
        Err(err) => {
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            let message = report_failure(&err, style);
            error_response(status, err.kind(), message)
        }
    }
}

async fn index() -> Html<String> {
    let options: String = CaptionStyle::ALL
        .into_iter()
        .map(|style| {
            let selected = if style == CaptionStyle::default() { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                style.id(),
                selected,
                style.label()
            )
        })
        .collect();
    Html(INDEX_HTML.replace("{{STYLE_OPTIONS}}", &options))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Detailed Image Captioning</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f4f5f7;
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 20px;
        }

        .panel {
            background: white;
            border-radius: 12px;
            box-shadow: 0 8px 30px rgba(0,0,0,0.12);
            max-width: 760px;
            width: 100%;
            padding: 32px;
        }

        h1 { color: #222; font-size: 1.6em; margin-bottom: 6px; }
        .subtitle { color: #666; margin-bottom: 24px; font-size: 0.9em; }

        label { display: block; font-weight: 600; color: #444; margin: 16px 0 6px; }

        .drop {
            border: 2px dashed #8a94a6;
            border-radius: 10px;
            padding: 36px 16px;
            text-align: center;
            cursor: pointer;
            color: #555;
        }
        .drop.dragover { border-color: #3b6fd8; background: #eef3ff; }
        .drop img { max-width: 100%; max-height: 320px; border-radius: 6px; }

        input[type="file"] { display: none; }
        select, button { font-size: 1em; padding: 8px 12px; border-radius: 6px; }
        select { width: 100%; border: 1px solid #ccd; }
        button {
            margin-top: 20px;
            background: #3b6fd8;
            color: white;
            border: none;
            cursor: pointer;
        }
        button:disabled { background: #9aa8c7; cursor: wait; }

        textarea {
            width: 100%;
            min-height: 160px;
            padding: 12px;
            border: 1px solid #ccd;
            border-radius: 6px;
            font: inherit;
            line-height: 1.5;
        }
        textarea.failed { border-color: #d33; color: #a22; }
        .meta { margin-top: 8px; font-size: 0.85em; color: #777; }
    </style>
</head>
<body>
    <div class="panel">
        <h1>Detailed Image Captioning</h1>
        <p class="subtitle">Upload an image to get a description in the style you choose.</p>

        <label for="fileInput">Image</label>
        <div class="drop" id="drop">
            <span id="dropText">Click or drag an image here</span>
            <input type="file" id="fileInput" accept="image/*">
        </div>

        <label for="style">Caption style</label>
        <select id="style" name="style">{{STYLE_OPTIONS}}</select>

        <button id="submit" disabled>Generate caption</button>

        <label for="output">Output</label>
        <textarea id="output" readonly></textarea>
        <div class="meta" id="meta"></div>
    </div>

    <script>
        const drop = document.getElementById('drop');
        const dropText = document.getElementById('dropText');
        const fileInput = document.getElementById('fileInput');
        const styleSelect = document.getElementById('style');
        const submit = document.getElementById('submit');
        const output = document.getElementById('output');
        const meta = document.getElementById('meta');
        let selected = null;

        drop.addEventListener('click', () => fileInput.click());
        drop.addEventListener('dragover', (e) => { e.preventDefault(); drop.classList.add('dragover'); });
        drop.addEventListener('dragleave', () => drop.classList.remove('dragover'));
        drop.addEventListener('drop', (e) => {
            e.preventDefault();
            drop.classList.remove('dragover');
            const file = e.dataTransfer.files[0];
            if (file && file.type.startsWith('image/')) choose(file);
        });
        fileInput.addEventListener('change', (e) => {
            if (e.target.files[0]) choose(e.target.files[0]);
        });

        function choose(file) {
            selected = file;
            const reader = new FileReader();
            reader.onload = (e) => {
                drop.innerHTML = '';
                const img = document.createElement('img');
                img.src = e.target.result;
                drop.appendChild(img);
                drop.appendChild(fileInput);
            };
            reader.readAsDataURL(file);
            submit.disabled = false;
        }

        submit.addEventListener('click', async () => {
            if (!selected) return;
            const form = new FormData();
            form.append('image', selected);
            form.append('style', styleSelect.value);

            submit.disabled = true;
            output.classList.remove('failed');
            output.value = 'Generating caption...';
            meta.textContent = '';

            try {
                const response = await fetch('/caption', { method: 'POST', body: form });
                const result = await response.json();
                if (response.ok) {
                    output.value = result.caption;
                    meta.textContent = result.model + ' • ' + result.processing_time_ms + ' ms';
                } else {
                    output.classList.add('failed');
                    output.value = result.error;
                }
            } catch (error) {
                output.classList.add('failed');
                output.value = 'Error: ' + error.message;
            } finally {
                submit.disabled = false;
            }
        });
    </script>
</body>
</html>
"#;
