//! Generation request and result types

use crate::kind::GenerationKind;
use crate::options::{GenerationOptions, OptionMap};
use chrono::{DateTime, Local};
use iron_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata recorded for a result: string keys to scalar JSON values
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A request to generate one piece of content.
///
/// Immutable once built; the kind always matches the options variant.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    /// A request with all options at their defaults
    pub fn with_defaults(kind: GenerationKind, prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationOptions::defaults(kind))
    }

    /// Build a request from an open option map, validating the options
    pub fn from_map(
        kind: GenerationKind,
        prompt: impl Into<String>,
        map: &OptionMap,
    ) -> Result<Self> {
        Ok(Self::new(prompt, GenerationOptions::from_map(kind, map)?))
    }

    pub fn kind(&self) -> GenerationKind {
        self.options.kind()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

/// The descriptor returned for a completed generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub kind: GenerationKind,
    /// Path of the placeholder output file
    pub output_path: PathBuf,
    /// JSON sidecar next to the output, when one was written
    #[serde(default)]
    pub sidecar_path: Option<PathBuf>,
    pub metadata: Metadata,
    pub created_at: DateTime<Local>,
}

impl GenerationResult {
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Look up a metadata value as a string
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}
