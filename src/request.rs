//! Generation requests and the animation vibes a user can pick from.

use serde::{Deserialize, Serialize};

/// Animation style applied to the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationVibe {
    Cinematic,
    Steamy,
    FastZoom,
    Neon,
}

impl AnimationVibe {
    /// All selectable vibes, in display order.
    pub const ALL: [AnimationVibe; 4] = [
        AnimationVibe::Cinematic,
        AnimationVibe::Steamy,
        AnimationVibe::FastZoom,
        AnimationVibe::Neon,
    ];

    /// Phrase interpolated into the generation prompt.
    pub fn phrase(&self) -> &'static str {
        match self {
            AnimationVibe::Cinematic => "Cinematic & Slow",
            AnimationVibe::Steamy => "Steamy & Hot",
            AnimationVibe::FastZoom => "Fast Zoom & Action",
            AnimationVibe::Neon => "Neon Lights & Cyberpunk",
        }
    }

    /// Parse a CLI-friendly name like `cinematic` or `fast-zoom`.
    pub fn parse(name: &str) -> Option<AnimationVibe> {
        match name.to_ascii_lowercase().as_str() {
            "cinematic" => Some(AnimationVibe::Cinematic),
            "steamy" => Some(AnimationVibe::Steamy),
            "fast-zoom" | "fastzoom" | "zoom" => Some(AnimationVibe::FastZoom),
            "neon" => Some(AnimationVibe::Neon),
            _ => None,
        }
    }
}

/// One image-to-video generation request.
///
/// Immutable once built; a new user action builds a new request.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    image_bytes: Vec<u8>,
    mime_type: String,
    vibe: AnimationVibe,
}

impl VideoRequest {
    pub fn new(image_bytes: Vec<u8>, mime_type: impl Into<String>, vibe: AnimationVibe) -> Self {
        Self {
            image_bytes,
            mime_type: mime_type.into(),
            vibe,
        }
    }

    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn vibe(&self) -> AnimationVibe {
        self.vibe
    }

    /// Natural-language instruction sent to the video model.
    pub fn prompt(&self) -> String {
        format!(
            "Transform this static image into a high-quality, professional video \
             advertisement suitable for Instagram Reels.\n\
             Style: {}.\n\
             Motion: Smooth, cinematic, high definition.\n\
             Make the subject come alive naturally.",
            self.vibe.phrase()
        )
    }
}
