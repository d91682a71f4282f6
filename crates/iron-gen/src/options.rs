//! Per-kind generation options
//!
//! Options arrive as an open key/value map (CLI flags, project documents,
//! form fields). They are resolved into a closed, per-kind structure at
//! construction time: unrecognized keys are dropped, missing keys take the
//! documented defaults, and present keys with bad values are rejected.

use crate::kind::GenerationKind;
use iron_core::{IronError, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Open-ended option input, keyed by option name
pub type OptionMap = serde_json::Map<String, Value>;

/// Writing style for text generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Creative,
    Formal,
    Casual,
    Technical,
    Poetic,
    Humorous,
}

/// Visual style shared by image and video generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    #[default]
    Realistic,
    Artistic,
    Cartoon,
    Abstract,
    Cinematic,
    Anime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioType {
    #[default]
    Speech,
    Music,
    SoundEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Neutral,
    Male,
    Female,
    Child,
    Narrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Webm,
    Avi,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = IronError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(ImageFormat::Png),
            "jpg" => Ok(ImageFormat::Jpg),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(IronError::invalid(format!(
                "Unknown image format '{}'. Use: png, jpg, webp",
                other
            ))),
        }
    }
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
        }
    }
}

impl VideoFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Webm => "webm",
            VideoFormat::Avi => "avi",
        }
    }
}

/// A `WIDTHxHEIGHT` pixel size, e.g. `1024x1024`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = IronError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IronError::invalid(format!("Invalid size '{}', expected WxH", s));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Dimensions {
    type Error = IronError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Dimensions> for String {
    fn from(d: Dimensions) -> Self {
        d.to_string()
    }
}

/// A strictly positive duration in seconds.
///
/// Whole numbers serialize as JSON integers so `10` round-trips as `10`.
/// Values past the exactly representable integer range stay floats.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Seconds(f64);

impl Seconds {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(IronError::invalid(format!(
                "Duration must be a positive number, got {}",
                value
            )))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for Seconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0 < MAX_EXACT_INTEGER {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Seconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => n,
            NumberOrText::Text(s) => s.trim().parse().map_err(de::Error::custom)?,
        };
        Seconds::new(value).map_err(de::Error::custom)
    }
}

/// Audio length: a fixed number of seconds, or `"auto"` to let the back-end decide
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AudioDuration {
    #[default]
    Auto,
    Seconds(Seconds),
}

impl Serialize for AudioDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AudioDuration::Auto => serializer.serialize_str("auto"),
            AudioDuration::Seconds(s) => s.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AudioDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Text(s) if s.trim().eq_ignore_ascii_case("auto") => {
                return Ok(AudioDuration::Auto)
            }
            NumberOrText::Text(s) => s.trim().parse().map_err(|_| {
                de::Error::custom(format!("expected a number of seconds or \"auto\", got '{}'", s))
            })?,
            NumberOrText::Number(n) => n,
        };
        Seconds::new(value)
            .map(AudioDuration::Seconds)
            .map_err(de::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) if n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 => {
            Ok(n as u32)
        }
        NumberOrText::Number(n) => Err(de::Error::custom(format!(
            "expected a positive integer, got {}",
            n
        ))),
        NumberOrText::Text(s) => s.trim().parse().map_err(|_| {
            de::Error::custom(format!("expected a positive integer, got '{}'", s))
        }),
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{}'", s))),
    }
}

/// Text generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub style: TextStyle,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_length: u32,
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            style: TextStyle::default(),
            max_length: 500,
            temperature: 0.7,
        }
    }
}

/// Image generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub size: Dimensions,
    pub style: VisualStyle,
    pub format: ImageFormat,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size: Dimensions::new(1024, 1024),
            style: VisualStyle::default(),
            format: ImageFormat::default(),
        }
    }
}

/// Audio generation options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    #[serde(rename = "type")]
    pub audio_type: AudioType,
    pub voice: Voice,
    pub duration: AudioDuration,
    pub format: AudioFormat,
}

/// Video generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub resolution: Dimensions,
    #[serde(deserialize_with = "lenient_u32")]
    pub fps: u32,
    pub duration: Seconds,
    pub style: VisualStyle,
    pub format: VideoFormat,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            resolution: Dimensions::new(1920, 1080),
            fps: 30,
            duration: Seconds(5.0),
            style: VisualStyle::default(),
            format: VideoFormat::default(),
        }
    }
}

/// Resolved, validated options for one request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOptions {
    Text(TextOptions),
    Image(ImageOptions),
    Audio(AudioOptions),
    Video(VideoOptions),
}

impl GenerationOptions {
    /// Default options for a kind
    pub fn defaults(kind: GenerationKind) -> Self {
        match kind {
            GenerationKind::Text => GenerationOptions::Text(TextOptions::default()),
            GenerationKind::Image => GenerationOptions::Image(ImageOptions::default()),
            GenerationKind::Audio => GenerationOptions::Audio(AudioOptions::default()),
            GenerationKind::Video => GenerationOptions::Video(VideoOptions::default()),
        }
    }

    /// Merge a raw option map over the defaults for `kind` and validate the result.
    ///
    /// Null values count as missing.
    pub fn from_map(kind: GenerationKind, map: &OptionMap) -> Result<Self> {
        let cleaned: OptionMap = map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let options = match kind {
            GenerationKind::Text => GenerationOptions::Text(parse_section(kind, cleaned)?),
            GenerationKind::Image => GenerationOptions::Image(parse_section(kind, cleaned)?),
            GenerationKind::Audio => GenerationOptions::Audio(parse_section(kind, cleaned)?),
            GenerationKind::Video => GenerationOptions::Video(parse_section(kind, cleaned)?),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationOptions::Text(_) => GenerationKind::Text,
            GenerationOptions::Image(_) => GenerationKind::Image,
            GenerationOptions::Audio(_) => GenerationKind::Audio,
            GenerationOptions::Video(_) => GenerationKind::Video,
        }
    }

    /// Output file extension implied by the options
    pub fn extension(&self) -> &'static str {
        match self {
            GenerationOptions::Text(_) => GenerationKind::Text.default_extension(),
            GenerationOptions::Image(o) => o.format.as_str(),
            GenerationOptions::Audio(o) => o.format.as_str(),
            GenerationOptions::Video(o) => o.format.as_str(),
        }
    }

    /// Check range constraints that the types alone do not capture
    pub fn validate(&self) -> Result<()> {
        match self {
            GenerationOptions::Text(o) => {
                if o.max_length == 0 {
                    return Err(IronError::invalid("max_length must be a positive integer"));
                }
                if !(0.0..=1.0).contains(&o.temperature) {
                    return Err(IronError::invalid(format!(
                        "temperature must be between 0 and 1, got {}",
                        o.temperature
                    )));
                }
            }
            GenerationOptions::Video(o) => {
                if o.fps == 0 {
                    return Err(IronError::invalid("fps must be a positive integer"));
                }
            }
            GenerationOptions::Image(_) | GenerationOptions::Audio(_) => {}
        }
        Ok(())
    }

    /// Every resolved option as a flat JSON object
    pub fn to_map(&self) -> Result<OptionMap> {
        let value = match self {
            GenerationOptions::Text(o) => serde_json::to_value(o)?,
            GenerationOptions::Image(o) => serde_json::to_value(o)?,
            GenerationOptions::Audio(o) => serde_json::to_value(o)?,
            GenerationOptions::Video(o) => serde_json::to_value(o)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(IronError::Serialization(format!(
                "options serialized to {} instead of an object",
                other
            ))),
        }
    }
}

fn parse_section<T: DeserializeOwned>(kind: GenerationKind, map: OptionMap) -> Result<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| IronError::invalid(format!("Invalid {} options: {}", kind, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> OptionMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let opts = GenerationOptions::from_map(GenerationKind::Video, &OptionMap::new()).unwrap();
        let GenerationOptions::Video(video) = opts else {
            panic!("expected video options");
        };
        assert_eq!(video.resolution, Dimensions::new(1920, 1080));
        assert_eq!(video.fps, 30);
        assert_eq!(video.duration.get(), 5.0);
        assert_eq!(video.format, VideoFormat::Mp4);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let opts = GenerationOptions::from_map(
            GenerationKind::Image,
            &map(json!({"size": "512x256", "fps": 24, "mood": "gloomy"})),
        )
        .unwrap();
        let out = opts.to_map().unwrap();
        assert_eq!(out["size"], json!("512x256"));
        assert!(!out.contains_key("fps"));
        assert!(!out.contains_key("mood"));
    }

    #[test]
    fn test_bad_values_are_invalid_requests() {
        let cases = [
            (GenerationKind::Image, json!({"format": "gif"})),
            (GenerationKind::Image, json!({"size": "huge"})),
            (GenerationKind::Text, json!({"temperature": 1.5})),
            (GenerationKind::Text, json!({"max_length": 0})),
            (GenerationKind::Audio, json!({"duration": -3})),
            (GenerationKind::Audio, json!({"type": "podcast"})),
            (GenerationKind::Video, json!({"fps": 0})),
            (GenerationKind::Video, json!({"duration": "auto"})),
        ];
        for (kind, raw) in cases {
            let err = GenerationOptions::from_map(kind, &map(raw.clone())).unwrap_err();
            assert!(
                matches!(err, IronError::InvalidRequest(_)),
                "{} {} gave {:?}",
                kind,
                raw,
                err
            );
        }
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let opts = GenerationOptions::from_map(
            GenerationKind::Video,
            &map(json!({"fps": "24", "duration": "12"})),
        )
        .unwrap();
        let out = opts.to_map().unwrap();
        assert_eq!(out["fps"], json!(24));
        assert_eq!(out["duration"], json!(12));
    }

    #[test]
    fn test_audio_duration_auto_and_seconds() {
        let auto = GenerationOptions::from_map(GenerationKind::Audio, &OptionMap::new()).unwrap();
        assert_eq!(auto.to_map().unwrap()["duration"], json!("auto"));

        let fixed = GenerationOptions::from_map(
            GenerationKind::Audio,
            &map(json!({"duration": 2.5, "type": "sound_effect"})),
        )
        .unwrap();
        let out = fixed.to_map().unwrap();
        assert_eq!(out["duration"], json!(2.5));
        assert_eq!(out["type"], json!("sound_effect"));
    }

    #[test]
    fn test_non_finite_strings_are_rejected() {
        for (kind, value) in [
            (GenerationKind::Text, json!({"temperature": "NaN"})),
            (GenerationKind::Video, json!({"duration": "inf"})),
            (GenerationKind::Audio, json!({"duration": "NaN"})),
        ] {
            let err = GenerationOptions::from_map(kind, &map(value)).unwrap_err();
            assert!(matches!(err, IronError::InvalidRequest(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_huge_duration_keeps_its_value() {
        let opts =
            GenerationOptions::from_map(GenerationKind::Video, &map(json!({"duration": 1e30})))
                .unwrap();
        assert_eq!(opts.to_map().unwrap()["duration"], json!(1e30));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let opts = GenerationOptions::from_map(
            GenerationKind::Text,
            &map(json!({"style": null, "max_length": 42})),
        )
        .unwrap();
        let GenerationOptions::Text(text) = opts else {
            panic!("expected text options");
        };
        assert_eq!(text.style, TextStyle::Creative);
        assert_eq!(text.max_length, 42);
    }

    #[test]
    fn test_extension_follows_format() {
        let opts = GenerationOptions::from_map(
            GenerationKind::Audio,
            &map(json!({"format": "ogg"})),
        )
        .unwrap();
        assert_eq!(opts.extension(), "ogg");
        assert_eq!(GenerationOptions::defaults(GenerationKind::Text).extension(), "txt");
    }

    #[test]
    fn test_dimensions_parse() {
        assert_eq!("640X480".parse::<Dimensions>().unwrap(), Dimensions::new(640, 480));
        assert!("0x480".parse::<Dimensions>().is_err());
        assert!("640".parse::<Dimensions>().is_err());
    }
}
