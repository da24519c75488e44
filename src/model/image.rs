//! Core domain types for image generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest prompt accepted by the generation service
pub const MAX_PROMPT_LEN: usize = 500;

/// Fixed output aspect ratios supported by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    pub fn all() -> [AspectRatio; 5] {
        [
            AspectRatio::Square,
            AspectRatio::Widescreen,
            AspectRatio::Vertical,
            AspectRatio::Landscape,
            AspectRatio::Portrait,
        ]
    }

    /// Display label, matching the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }

    /// Composition phrase appended to the outgoing prompt
    pub fn prompt_context(&self) -> &'static str {
        match self {
            AspectRatio::Square => "square composition",
            AspectRatio::Widescreen => "widescreen landscape composition",
            AspectRatio::Vertical => "portrait composition",
            AspectRatio::Landscape => "landscape composition",
            AspectRatio::Portrait => "portrait composition",
        }
    }

    /// Cycle to the next ratio (wraps around)
    pub fn next(&self) -> AspectRatio {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Cycle to the previous ratio (wraps around)
    pub fn previous(&self) -> AspectRatio {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Fixed rendering styles supported by the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStyle {
    #[default]
    Photorealistic,
    Artistic,
    Abstract,
    Anime,
    DigitalArt,
}

impl GenerationStyle {
    pub fn all() -> [GenerationStyle; 5] {
        [
            GenerationStyle::Photorealistic,
            GenerationStyle::Artistic,
            GenerationStyle::Abstract,
            GenerationStyle::Anime,
            GenerationStyle::DigitalArt,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationStyle::Photorealistic => "photorealistic",
            GenerationStyle::Artistic => "artistic",
            GenerationStyle::Abstract => "abstract",
            GenerationStyle::Anime => "anime",
            GenerationStyle::DigitalArt => "digital-art",
        }
    }

    /// Style phrase appended to the outgoing prompt
    pub fn prompt_modifier(&self) -> &'static str {
        match self {
            GenerationStyle::Photorealistic => "photorealistic, high quality, detailed",
            GenerationStyle::Artistic => "artistic, creative, expressive",
            GenerationStyle::Abstract => "abstract, conceptual, non-representational",
            GenerationStyle::Anime => "anime style, manga inspired, stylized",
            GenerationStyle::DigitalArt => "digital art, contemporary, modern",
        }
    }
}

/// Per-request generation parameters.
///
/// A value object: copied onto each request and stored verbatim with the
/// resulting image. Optional fields are omitted from the serialized form
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub aspect_ratio: AspectRatio,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<GenerationStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// One generated image in the gallery.
///
/// Immutable after creation except for the favorite flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub prompt: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
    pub settings: GenerationSettings,
    #[serde(rename = "isFavorite", default)]
    pub favorite: bool,
}

impl GeneratedImage {
    /// Build a fresh gallery entry for a just-completed generation
    pub fn new(prompt: String, image_url: String, settings: GenerationSettings) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt,
            image_url,
            timestamp: Utc::now(),
            settings,
            favorite: false,
        }
    }
}

/// A single generation attempt as submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub settings: GenerationSettings,
}

/// Uniform outcome of one call to the generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub success: bool,
    pub image_url: Option<String>,
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

impl GenerationResponse {
    pub fn ok(image_url: String, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            image_url: Some(image_url),
            error: None,
            processing_time_ms,
        }
    }

    pub fn failure(error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Widescreen).unwrap();
        assert_eq!(json, "\"16:9\"");

        let back: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(back, AspectRatio::Vertical);
    }

    #[test]
    fn test_aspect_ratio_cycle_wraps() {
        assert_eq!(AspectRatio::Portrait.next(), AspectRatio::Square);
        assert_eq!(AspectRatio::Square.previous(), AspectRatio::Portrait);
    }

    #[test]
    fn test_style_serializes_kebab_case() {
        let json = serde_json::to_string(&GenerationStyle::DigitalArt).unwrap();
        assert_eq!(json, "\"digital-art\"");
    }

    #[test]
    fn test_image_roundtrip_reconstructs_timestamp() {
        let image = GeneratedImage::new(
            "a red circle".to_string(),
            "http://x/img.png".to_string(),
            GenerationSettings::default(),
        );

        let json = serde_json::to_string(&image).unwrap();
        // Timestamps go over the wire as ISO strings
        assert!(json.contains("\"timestamp\":\""));

        let back: GeneratedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_image_favorite_defaults_to_false_when_missing() {
        let json = r#"{
            "id": "abc",
            "prompt": "p",
            "imageUrl": "http://x/1.png",
            "timestamp": "2024-01-15T10:30:00Z",
            "settings": { "aspectRatio": "1:1" }
        }"#;

        let image: GeneratedImage = serde_json::from_str(json).unwrap();
        assert!(!image.favorite);
        assert!(image.settings.style.is_none());
    }
}
