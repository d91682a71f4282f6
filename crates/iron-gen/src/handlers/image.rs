use super::{label, wrong_kind};
use crate::handler::{KindHandler, Payload};
use crate::kind::GenerationKind;
use crate::options::GenerationOptions;
use crate::request::GenerationRequest;
use chrono::{DateTime, Local};
use iron_core::Result;

/// Records image requests as a sidecar until an image back-end is wired in
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageHandler;

impl KindHandler for ImageHandler {
    fn name(&self) -> &str {
        "placeholder-image"
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::Image
    }

    fn render(
        &self,
        request: &GenerationRequest,
        _generated_at: &DateTime<Local>,
    ) -> Result<Payload> {
        match request.options() {
            GenerationOptions::Image(_) => Ok(Payload::Placeholder),
            _ => Err(wrong_kind(GenerationKind::Image, request)),
        }
    }

    fn summary(&self, request: &GenerationRequest) -> Vec<String> {
        match request.options() {
            GenerationOptions::Image(opts) => vec![
                format!("Prompt: {}", request.prompt()),
                format!("Size: {}, Style: {}", opts.size, label(&opts.style)),
            ],
            _ => Vec::new(),
        }
    }
}
