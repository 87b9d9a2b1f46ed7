//! Image captioning through an OpenRouter-style chat-completions endpoint.
//!
//! The flow for one call is: image bytes → data URL → prompts for the chosen
//! [`CaptionStyle`] → one POST → `choices[0].message.content`.

pub mod caption;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod request;
pub mod server;
pub mod style;

pub use caption::{caption_file, caption_image, describe_image};
pub use config::Config;
pub use error::{CaptionError, ConfigError};
pub use request::CaptionRequest;
pub use style::{CaptionStyle, UnknownStyle};
