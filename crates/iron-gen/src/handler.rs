//! Kind handler trait and registry
//!
//! A handler turns a validated request into the payload written at the
//! output path. The built-in handlers produce placeholders; a real back-end
//! replaces one of them through `HandlerRegistry::register`.

use crate::handlers::{AudioHandler, ImageHandler, TextHandler, VideoHandler};
use crate::kind::GenerationKind;
use crate::request::GenerationRequest;
use chrono::{DateTime, Local};
use iron_core::Result;
use std::collections::BTreeMap;

/// What a handler produced for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Content written as the output file body. No sidecar is written.
    Body(String),
    /// No content yet: an empty placeholder file plus a JSON metadata sidecar
    Placeholder,
}

/// Trait implemented by each kind handler
pub trait KindHandler: Send + Sync {
    /// Handler name recorded in result metadata
    fn name(&self) -> &str;

    /// The kind this handler serves
    fn kind(&self) -> GenerationKind;

    /// Produce the payload for a request of this handler's kind
    fn render(
        &self,
        request: &GenerationRequest,
        generated_at: &DateTime<Local>,
    ) -> Result<Payload>;

    /// Human-readable description lines for the resolved request
    fn summary(&self, request: &GenerationRequest) -> Vec<String>;
}

/// Maps each kind to the handler that serves it
pub struct HandlerRegistry {
    handlers: BTreeMap<GenerationKind, Box<dyn KindHandler>>,
}

impl HandlerRegistry {
    /// An empty registry; every dispatch fails until handlers are registered
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registry with the placeholder handler for every kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextHandler));
        registry.register(Box::new(ImageHandler));
        registry.register(Box::new(AudioHandler));
        registry.register(Box::new(VideoHandler));
        registry
    }

    /// Install a handler for its kind, returning the one it replaces
    pub fn register(&mut self, handler: Box<dyn KindHandler>) -> Option<Box<dyn KindHandler>> {
        self.handlers.insert(handler.kind(), handler)
    }

    pub fn get(&self, kind: GenerationKind) -> Option<&dyn KindHandler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }

    /// Kinds that have a handler, in project order
    pub fn kinds(&self) -> Vec<GenerationKind> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
