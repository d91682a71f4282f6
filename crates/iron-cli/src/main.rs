//! Iron CLI - Command-line interface for Iron Creator

mod commands;
mod telemetry;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::generate::OptionFlags;
use commands::{generate, project};
use iron_gen::{Dispatcher, GenerationKind, GeneratorConfig, History, Session};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "iron")]
#[command(
    about = "Placeholder multimedia generator: records text, image, audio and video requests",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Type of content to generate
    mode: Mode,

    /// Generation prompt (required for every mode except project)
    prompt: Option<String>,

    /// Path to a JSON configuration file (project mode: the project document)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Generation style
    #[arg(long)]
    style: Option<String>,

    /// Audio type (speech, music, sound_effect)
    #[arg(long = "type")]
    audio_type: Option<String>,

    /// Duration in seconds, or "auto" for audio
    #[arg(long)]
    duration: Option<String>,

    /// Image size (e.g., 1024x1024)
    #[arg(long)]
    size: Option<String>,

    /// Video resolution (e.g., 1920x1080)
    #[arg(long)]
    resolution: Option<String>,

    /// Frames per second (video only)
    #[arg(long)]
    fps: Option<u32>,

    /// Output format (png, jpg, webp, mp3, wav, ogg, mp4, webm, avi)
    #[arg(long)]
    format: Option<String>,

    /// Voice (audio only)
    #[arg(long)]
    voice: Option<String>,

    /// Maximum length (text only)
    #[arg(long)]
    max_length: Option<u32>,

    /// Sampling temperature between 0 and 1 (text only)
    #[arg(long)]
    temperature: Option<f64>,

    /// Continue from a history previously written with --history-out
    #[arg(long)]
    history_in: Option<PathBuf>,

    /// Write the session history as JSON to this path on exit
    #[arg(long)]
    history_out: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Text,
    Image,
    Audio,
    Video,
    Project,
}

impl Mode {
    fn kind(self) -> Option<GenerationKind> {
        match self {
            Mode::Text => Some(GenerationKind::Text),
            Mode::Image => Some(GenerationKind::Image),
            Mode::Audio => Some(GenerationKind::Audio),
            Mode::Video => Some(GenerationKind::Video),
            Mode::Project => None,
        }
    }
}

impl Cli {
    fn option_flags(&self) -> OptionFlags {
        OptionFlags {
            style: self.style.clone(),
            audio_type: self.audio_type.clone(),
            duration: self.duration.clone(),
            size: self.size.clone(),
            resolution: self.resolution.clone(),
            fps: self.fps,
            format: self.format.clone(),
            voice: self.voice.clone(),
            max_length: self.max_length,
            temperature: self.temperature,
        }
    }

    fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::load(self.config.as_deref());
        match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level);

    let config = cli.generator_config();
    debug!(
        output_dir = %config.output_dir.display(),
        quality = %config.quality,
        "configuration resolved"
    );
    let dispatcher = Dispatcher::new(config);
    let mut session = match &cli.history_in {
        Some(path) => Session::with_history(dispatcher, History::load(path)?),
        None => Session::new(dispatcher),
    };

    let outcome = match cli.mode.kind() {
        Some(kind) => generate::run(&mut session, kind, cli.prompt.as_deref(), &cli.option_flags()),
        None => project::run(&mut session, cli.config.as_deref()),
    };

    if let Some(path) = &cli.history_out {
        session.history().save(path)?;
        println!("History saved to: {}", path.display());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_image_flags() {
        let cli = Cli::try_parse_from([
            "iron", "image", "a cat", "--size", "512x512", "--style", "cartoon", "--format", "webp",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Image);
        assert_eq!(cli.prompt.as_deref(), Some("a cat"));

        let map = cli.option_flags().to_option_map();
        assert_eq!(map["size"], json!("512x512"));
        assert_eq!(map["style"], json!("cartoon"));
        assert_eq!(map["format"], json!("webp"));
    }

    #[test]
    fn test_parse_audio_type_and_duration() {
        let cli = Cli::try_parse_from([
            "iron", "audio", "calm music", "--type", "music", "--duration", "10",
        ])
        .unwrap();
        let map = cli.option_flags().to_option_map();
        assert_eq!(map["type"], json!("music"));
        assert_eq!(map["duration"], json!(10.0));
    }

    #[test]
    fn test_project_mode_needs_no_prompt() {
        let cli = Cli::try_parse_from(["iron", "project", "--config", "project.json"]).unwrap();
        assert_eq!(cli.mode.kind(), None);
        assert_eq!(cli.config, Some(PathBuf::from("project.json")));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["iron", "hologram", "x"]).is_err());
    }

    #[test]
    fn test_history_flags() {
        let cli = Cli::try_parse_from([
            "iron", "text", "hi", "--history-in", "old.json", "--history-out", "new.json",
        ])
        .unwrap();
        assert_eq!(cli.history_in, Some(PathBuf::from("old.json")));
        assert_eq!(cli.history_out, Some(PathBuf::from("new.json")));
    }

    #[test]
    fn test_output_dir_flag_wins() {
        let cli = Cli::try_parse_from(["iron", "text", "hi", "--output-dir", "elsewhere"]).unwrap();
        assert_eq!(cli.generator_config().output_dir, PathBuf::from("elsewhere"));
    }
}
