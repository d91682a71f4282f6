use super::{label, wrong_kind};
use crate::handler::{KindHandler, Payload};
use crate::kind::GenerationKind;
use crate::options::GenerationOptions;
use crate::request::GenerationRequest;
use chrono::{DateTime, Local};
use iron_core::Result;

/// Records speech, music and sound effect requests as a sidecar
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioHandler;

impl KindHandler for AudioHandler {
    fn name(&self) -> &str {
        "placeholder-audio"
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::Audio
    }

    fn render(
        &self,
        request: &GenerationRequest,
        _generated_at: &DateTime<Local>,
    ) -> Result<Payload> {
        match request.options() {
            GenerationOptions::Audio(_) => Ok(Payload::Placeholder),
            _ => Err(wrong_kind(GenerationKind::Audio, request)),
        }
    }

    fn summary(&self, request: &GenerationRequest) -> Vec<String> {
        match request.options() {
            GenerationOptions::Audio(opts) => vec![
                format!(
                    "Type: {}, Voice: {}, Duration: {}",
                    label(&opts.audio_type),
                    label(&opts.voice),
                    label(&opts.duration)
                ),
                format!("Prompt: {}", request.prompt()),
            ],
            _ => Vec::new(),
        }
    }
}
