//! Content kinds

use iron_core::IronError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of content to generate.
///
/// Declaration order is the order a project runs its kinds in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Text,
    Image,
    Audio,
    Video,
}

impl GenerationKind {
    /// All kinds in project order
    pub const ALL: [GenerationKind; 4] = [
        GenerationKind::Text,
        GenerationKind::Image,
        GenerationKind::Audio,
        GenerationKind::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Text => "text",
            GenerationKind::Image => "image",
            GenerationKind::Audio => "audio",
            GenerationKind::Video => "video",
        }
    }

    /// File extension used when the options name no format
    pub fn default_extension(&self) -> &'static str {
        match self {
            GenerationKind::Text => "txt",
            GenerationKind::Image => "png",
            GenerationKind::Audio => "mp3",
            GenerationKind::Video => "mp4",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationKind {
    type Err = IronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(GenerationKind::Text),
            "image" => Ok(GenerationKind::Image),
            "audio" => Ok(GenerationKind::Audio),
            "video" => Ok(GenerationKind::Video),
            other => Err(IronError::invalid(format!(
                "Unknown kind '{}'. Use: text, image, audio, video",
                other
            ))),
        }
    }
}
