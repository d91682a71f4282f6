use super::{label, wrong_kind};
use crate::handler::{KindHandler, Payload};
use crate::kind::GenerationKind;
use crate::options::GenerationOptions;
use crate::request::GenerationRequest;
use chrono::{DateTime, Local};
use iron_core::Result;

/// Records video requests as a sidecar until a video back-end is wired in
#[derive(Debug, Default, Clone, Copy)]
pub struct VideoHandler;

impl KindHandler for VideoHandler {
    fn name(&self) -> &str {
        "placeholder-video"
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::Video
    }

    fn render(
        &self,
        request: &GenerationRequest,
        _generated_at: &DateTime<Local>,
    ) -> Result<Payload> {
        match request.options() {
            GenerationOptions::Video(_) => Ok(Payload::Placeholder),
            _ => Err(wrong_kind(GenerationKind::Video, request)),
        }
    }

    fn summary(&self, request: &GenerationRequest) -> Vec<String> {
        match request.options() {
            GenerationOptions::Video(opts) => vec![
                format!("Duration: {}s, Resolution: {}", opts.duration, opts.resolution),
                format!("Style: {}, FPS: {}", label(&opts.style), opts.fps),
                format!("Prompt: {}", request.prompt()),
            ],
            _ => Vec::new(),
        }
    }
}
