//! Generation dispatcher
//!
//! Validates a request against configuration, asks the kind's handler for a
//! payload, and writes it under a fresh output path together with its
//! metadata.

use crate::clock::{file_stamp, Clock, SystemClock};
use crate::config::GeneratorConfig;
use crate::handler::{HandlerRegistry, KindHandler, Payload};
use crate::kind::GenerationKind;
use crate::options::OptionMap;
use crate::output::{allocate, sidecar_path};
use crate::request::{GenerationRequest, GenerationResult, Metadata};
use iron_core::{ContentHash, IronError, Result};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Routes requests to kind handlers and persists the results
pub struct Dispatcher {
    config: GeneratorConfig,
    handlers: HandlerRegistry,
    clock: Box<dyn Clock>,
}

impl Dispatcher {
    /// Dispatcher with the placeholder handlers and the system clock
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            handlers: HandlerRegistry::with_defaults(),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the handler registry
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Replace the time source
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn handler(&self, kind: GenerationKind) -> Option<&dyn KindHandler> {
        self.handlers.get(kind)
    }

    /// Build a request from raw options, filling config-driven defaults first
    pub fn request(
        &self,
        kind: GenerationKind,
        prompt: impl Into<String>,
        options: &OptionMap,
    ) -> Result<GenerationRequest> {
        let mut options = options.clone();
        self.config.apply_defaults(kind, &mut options);
        GenerationRequest::from_map(kind, prompt, &options)
    }

    /// Generate one piece of content.
    ///
    /// Disabled kinds, missing handlers and blank prompts are rejected before
    /// anything touches the filesystem.
    pub fn dispatch(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let kind = request.kind();
        if !self.config.is_enabled(kind) {
            return Err(IronError::invalid(format!(
                "{} generation is disabled in config",
                kind
            )));
        }
        if request.prompt().trim().is_empty() {
            return Err(IronError::invalid(format!(
                "prompt required for {} generation",
                kind
            )));
        }
        let handler = self.handlers.get(kind).ok_or_else(|| {
            IronError::invalid(format!("no handler registered for {}", kind))
        })?;

        let created_at = self.clock.now();
        let payload = handler.render(request, &created_at)?;

        let mut metadata = Metadata::new();
        metadata.insert("prompt".to_string(), request.prompt().into());
        metadata.extend(request.options().to_map()?);
        metadata.insert("generated_at".to_string(), created_at.to_rfc3339().into());
        metadata.insert("kind".to_string(), kind.as_str().into());
        metadata
            .entry("type")
            .or_insert_with(|| Value::from(kind.as_str()));
        metadata.insert("handler".to_string(), handler.name().into());
        metadata.insert("quality".to_string(), self.config.quality.clone().into());

        let sidecar_json = match &payload {
            Payload::Body(body) => {
                metadata.insert(
                    "content_hash".to_string(),
                    ContentHash::from_bytes(body.as_bytes()).to_prefixed_hex().into(),
                );
                None
            }
            Payload::Placeholder => Some(serde_json::to_string_pretty(&metadata)?),
        };

        std::fs::create_dir_all(self.output_dir())?;
        let (output_path, mut file) = allocate(
            self.output_dir(),
            kind,
            &file_stamp(&created_at),
            request.options().extension(),
        )?;

        let written = match (&payload, sidecar_json) {
            (Payload::Body(body), _) => file.write_all(body.as_bytes()).map(|_| None),
            (Payload::Placeholder, Some(json)) => {
                drop(file);
                let sidecar = sidecar_path(&output_path);
                std::fs::write(&sidecar, json).map(|_| Some(sidecar))
            }
            (Payload::Placeholder, None) => Ok(None),
        };
        let sidecar_path = match written {
            Ok(path) => path,
            Err(e) => {
                std::fs::remove_file(&output_path).ok();
                return Err(e.into());
            }
        };

        info!(
            kind = %kind,
            path = %output_path.display(),
            sidecar = sidecar_path.is_some(),
            "generation recorded"
        );

        Ok(GenerationResult {
            kind,
            output_path,
            sidecar_path,
            metadata,
            created_at,
        })
    }
}
