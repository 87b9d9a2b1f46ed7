//! Chat-completions wire format.

use serde::{Deserialize, Serialize};

use crate::style::CaptionStyle;

/// One caption call, built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub image_data_url: String,
}

impl CaptionRequest {
    pub fn new(model: impl Into<String>, style: CaptionStyle, image_data_url: String) -> Self {
        let (system_prompt, user_prompt) = style.prompts();
        Self {
            model: model.into(),
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            image_data_url,
        }
    }

    pub fn to_body(&self) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage::System {
                    content: &self.system_prompt,
                },
                ChatMessage::User {
                    content: [
                        ContentPart::Text {
                            text: &self.user_prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: &self.image_data_url,
                            },
                        },
                    ],
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage<'a> {
    System { content: &'a str },
    User { content: [ContentPart<'a>; 2] },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl<'a> {
    pub url: &'a str,
}

/// The only part of the response that is read: `choices[0].message.content`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

impl ChatCompletionResponse {
    /// Returns the first choice's content, if the value has that shape.
    pub fn first_content(value: &serde_json::Value) -> Option<String> {
        let parsed: Self = serde_json::from_value(value.clone()).ok()?;
        parsed.choices.into_iter().next().map(|c| c.message.content)
    }
}
