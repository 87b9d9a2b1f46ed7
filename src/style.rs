use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Selects which canned system/user prompt pair frames the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    Short,
    #[default]
    Long,
    Technical,
    Creative,
    SeoFriendly,
    Emotional,
    Historical,
    Artistic,
    Scientific,
    Cultural,
}

/// A style id that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown caption style: {0:?}")]
pub struct UnknownStyle(pub String);

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 10] = [
        Self::Short,
        Self::Long,
        Self::Technical,
        Self::Creative,
        Self::SeoFriendly,
        Self::Emotional,
        Self::Historical,
        Self::Artistic,
        Self::Scientific,
        Self::Cultural,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Technical => "technical",
            Self::Creative => "creative",
            Self::SeoFriendly => "seo_friendly",
            Self::Emotional => "emotional",
            Self::Historical => "historical",
            Self::Artistic => "artistic",
            Self::Scientific => "scientific",
            Self::Cultural => "cultural",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Long => "Long",
            Self::Technical => "Technical",
            Self::Creative => "Creative",
            Self::SeoFriendly => "SEO-friendly",
            Self::Emotional => "Emotional",
            Self::Historical => "Historical",
            Self::Artistic => "Artistic",
            Self::Scientific => "Scientific",
            Self::Cultural => "Cultural",
        }
    }

    /// Returns the `(system_prompt, user_prompt)` pair for this style.
    pub fn prompts(self) -> (&'static str, &'static str) {
        match self {
            Self::Short => (
                "You are an AI that writes short, accurate image captions. Identify the main \
                 subject and the single most important detail, and nothing more.",
                "Write a one-sentence caption for this image.",
            ),
            Self::Long => (
                "You are an advanced AI capable of analyzing images. Your task is to provide \
                 detailed, accurate, and concise descriptions of the images presented to you. \
                 Focus on the main elements, colors, actions, and overall composition. If there \
                 are any notable or unusual aspects, mention those as well.",
                "Please describe this image in detail.",
            ),
            Self::Technical => (
                "You are a professional photographer and imaging technician. Describe images in \
                 technical terms: composition, framing, focal length, depth of field, exposure, \
                 lighting setup, color balance, and any visible processing or artifacts.",
                "Give a technical description of this image, covering how it was likely \
                 captured and processed.",
            ),
            Self::Creative => (
                "You are an imaginative writer. Turn what you see in an image into a vivid, \
                 original caption that tells a small story, while staying faithful to what is \
                 actually shown.",
                "Write a creative, story-like caption for this image.",
            ),
            Self::SeoFriendly => (
                "You are an SEO specialist writing image alt text and captions for the web. \
                 Be descriptive and specific, naturally include relevant keywords, avoid \
                 keyword stuffing, and keep the caption under 160 characters.",
                "Write an SEO-friendly caption for this image, followed by a short list of \
                 relevant keywords.",
            ),
            Self::Emotional => (
                "You are an empathetic observer. Describe images by focusing on the mood, \
                 atmosphere, and emotions they convey, including the feelings of any people \
                 or animals shown and the emotional response the scene invites.",
                "Describe the mood and emotions conveyed by this image.",
            ),
            Self::Historical => (
                "You are a historian. Describe images by placing them in historical context: \
                 the likely era, period-specific clothing, architecture, objects, and \
                 technology, and any historical events or movements they relate to. Say so \
                 when the period cannot be determined.",
                "Describe this image from a historical perspective.",
            ),
            Self::Artistic => (
                "You are an art critic. Describe images in terms of artistic style, technique, \
                 medium, use of color and light, composition, and possible influences or \
                 movements, as you would in a gallery review.",
                "Write an artistic analysis of this image.",
            ),
            Self::Scientific => (
                "You are a scientist. Describe images objectively and precisely, identifying \
                 species, materials, natural phenomena, or physical processes where possible, \
                 and distinguish clearly between observation and inference.",
                "Give a scientific description of what this image shows.",
            ),
            Self::Cultural => (
                "You are a cultural anthropologist. Describe images by highlighting cultural \
                 elements such as traditions, symbols, clothing, food, rituals, and social \
                 context, and explain their significance respectfully and without \
                 stereotyping.",
                "Describe the cultural elements and significance of this image.",
            ),
        }
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CaptionStyle {
    type Err = UnknownStyle;

    /// Accepts the id or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| {
                style.id().eq_ignore_ascii_case(wanted) || style.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
