//! Layered configuration system
//!
//! Config is loaded with these layers of precedence (highest wins):
//! 1. Environment variable: `IRON_OUTPUT_DIR`
//! 2. Explicit file passed by the caller (JSON, or TOML by extension)
//! 3. Project-local: `.iron/config.toml`
//! 4. Global: `~/.iron/config.toml`
//!
//! A layer that cannot be read or parsed is skipped with a warning.

use crate::kind::GenerationKind;
use crate::options::{ImageFormat, OptionMap};
use iron_core::{IronError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const OUTPUT_DIR_ENV: &str = "IRON_OUTPUT_DIR";

/// One configuration layer as it appears on disk. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub default_format: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub enable_text: Option<bool>,
    #[serde(default)]
    pub enable_image: Option<bool>,
    #[serde(default)]
    pub enable_audio: Option<bool>,
    #[serde(default)]
    pub enable_video: Option<bool>,
}

/// Resolved generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Image format used when a request names none
    pub default_format: String,
    /// Informational only; recorded but not acted on
    pub quality: String,
    pub enable_text: bool,
    pub enable_image: bool,
    pub enable_audio: bool,
    pub enable_video: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated_media"),
            default_format: "png".to_string(),
            quality: "high".to_string(),
            enable_text: true,
            enable_image: true,
            enable_audio: true,
            enable_video: true,
        }
    }
}

impl GeneratorConfig {
    /// Load config with layered precedence: global < project < explicit < env vars
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut layers = Vec::new();
        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                layers.push(global);
            }
        }
        let local = PathBuf::from(".iron/config.toml");
        if local.exists() {
            layers.push(local);
        }
        if let Some(path) = explicit {
            layers.push(path.to_path_buf());
        }

        let mut file = Self::merge_layers(&layers);
        Self::apply_env_overrides(&mut file);
        Self::default().overlay(file)
    }

    /// Load the given files in order, later files overriding earlier ones.
    /// Missing or malformed files are skipped.
    pub fn load_layers(paths: &[PathBuf]) -> Self {
        Self::default().overlay(Self::merge_layers(paths))
    }

    /// Parse a single config file, choosing the format by extension
    pub fn load_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IronError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        if is_toml {
            toml::from_str(&content).map_err(|e| {
                IronError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                IronError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
            })
        }
    }

    /// Replace the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Check whether a kind may be generated
    pub fn is_enabled(&self, kind: GenerationKind) -> bool {
        match kind {
            GenerationKind::Text => self.enable_text,
            GenerationKind::Image => self.enable_image,
            GenerationKind::Audio => self.enable_audio,
            GenerationKind::Video => self.enable_video,
        }
    }

    /// Turn a kind on or off
    pub fn set_enabled(&mut self, kind: GenerationKind, enabled: bool) {
        match kind {
            GenerationKind::Text => self.enable_text = enabled,
            GenerationKind::Image => self.enable_image = enabled,
            GenerationKind::Audio => self.enable_audio = enabled,
            GenerationKind::Video => self.enable_video = enabled,
        }
    }

    /// Fill config-driven defaults into a raw option map.
    ///
    /// Images without an explicit format use `default_format` when it names an
    /// image format.
    pub fn apply_defaults(&self, kind: GenerationKind, options: &mut OptionMap) {
        if kind != GenerationKind::Image {
            return;
        }
        let has_format = options.get("format").map(|v| !v.is_null()).unwrap_or(false);
        if has_format {
            return;
        }
        match self.default_format.parse::<ImageFormat>() {
            Ok(format) => {
                options.insert("format".to_string(), format.as_str().into());
            }
            Err(_) => debug!(
                default_format = %self.default_format,
                "default_format is not an image format, keeping png"
            ),
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".iron").join("config.toml"))
    }

    fn merge_layers(paths: &[PathBuf]) -> ConfigFile {
        let mut merged = ConfigFile::default();
        for path in paths {
            match Self::load_file(path) {
                Ok(layer) => {
                    debug!(path = %path.display(), "loaded config layer");
                    Self::merge_into(&mut merged, layer);
                }
                Err(e) => warn!("Could not load config file, using defaults: {}", e),
            }
        }
        merged
    }

    fn merge_into(base: &mut ConfigFile, overlay: ConfigFile) {
        if overlay.output_dir.is_some() {
            base.output_dir = overlay.output_dir;
        }
        if overlay.default_format.is_some() {
            base.default_format = overlay.default_format;
        }
        if overlay.quality.is_some() {
            base.quality = overlay.quality;
        }
        if overlay.enable_text.is_some() {
            base.enable_text = overlay.enable_text;
        }
        if overlay.enable_image.is_some() {
            base.enable_image = overlay.enable_image;
        }
        if overlay.enable_audio.is_some() {
            base.enable_audio = overlay.enable_audio;
        }
        if overlay.enable_video.is_some() {
            base.enable_video = overlay.enable_video;
        }
    }

    fn apply_env_overrides(file: &mut ConfigFile) {
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                file.output_dir = Some(dir);
            }
        }
    }

    fn overlay(mut self, file: ConfigFile) -> Self {
        if let Some(dir) = file.output_dir {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = file.default_format {
            self.default_format = format;
        }
        if let Some(quality) = file.quality {
            self.quality = quality;
        }
        self.enable_text = file.enable_text.unwrap_or(self.enable_text);
        self.enable_image = file.enable_image.unwrap_or(self.enable_image);
        self.enable_audio = file.enable_audio.unwrap_or(self.enable_audio);
        self.enable_video = file.enable_video.unwrap_or(self.enable_video);
        self
    }
}
