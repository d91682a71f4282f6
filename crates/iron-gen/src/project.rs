//! Project mode: several kinds generated as one batch
//!
//! Kinds run sequentially in fixed order (text, image, audio, video). A
//! failing kind is recorded and the remaining kinds still run.

use crate::dispatcher::Dispatcher;
use crate::kind::GenerationKind;
use crate::options::OptionMap;
use crate::request::{GenerationRequest, GenerationResult};
use iron_core::{IronError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Project file contents: `{ "prompts": {...}, "params": {...} }`.
///
/// Params for a kind live under `"<kind>_params"` or `"<kind>"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl ProjectDocument {
    /// Load a project document from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| {
            IronError::invalid(format!("Failed to parse project {}: {}", path.display(), e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IronError::invalid(e.to_string()))
    }

    /// Prompt given for a kind, matching keys case-insensitively
    pub fn prompt_for(&self, kind: GenerationKind) -> Option<&str> {
        self.prompts
            .iter()
            .find(|(key, _)| key.parse::<GenerationKind>().ok() == Some(kind))
            .map(|(_, prompt)| prompt.as_str())
    }

    /// Raw option map for a kind (empty when none given)
    pub fn params_for(&self, kind: GenerationKind) -> Result<OptionMap> {
        let value = self
            .params
            .get(&format!("{}_params", kind))
            .or_else(|| self.params.get(kind.as_str()));
        match value {
            None | Some(Value::Null) => Ok(OptionMap::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(IronError::invalid(format!(
                "params for {} must be an object, got {}",
                kind, other
            ))),
        }
    }
}

/// An ordered batch of requests, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectRequest {
    requests: BTreeMap<GenerationKind, GenerationRequest>,
}

impl ProjectRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request, replacing any earlier one of the same kind
    pub fn insert(&mut self, request: GenerationRequest) -> Option<GenerationRequest> {
        self.requests.insert(request.kind(), request)
    }

    pub fn get(&self, kind: GenerationKind) -> Option<&GenerationRequest> {
        self.requests.get(&kind)
    }

    /// Included kinds in run order
    pub fn kinds(&self) -> Vec<GenerationKind> {
        self.requests.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requests in run order
    pub fn iter(&self) -> impl Iterator<Item = &GenerationRequest> {
        self.requests.values()
    }

    /// Build a batch from a project document.
    ///
    /// Kinds whose options fail validation are returned separately so the
    /// caller can report them alongside the dispatch failures.
    pub fn from_document(
        doc: &ProjectDocument,
        dispatcher: &Dispatcher,
    ) -> (Self, BTreeMap<GenerationKind, IronError>) {
        let mut batch = Self::new();
        let mut rejected = BTreeMap::new();

        for (key, prompt) in &doc.prompts {
            let kind = match key.parse::<GenerationKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(key = %key, "ignoring prompt for unknown kind");
                    continue;
                }
            };
            let request = doc
                .params_for(kind)
                .and_then(|params| dispatcher.request(kind, prompt.clone(), &params));
            match request {
                Ok(request) => {
                    batch.insert(request);
                }
                Err(e) => {
                    rejected.insert(kind, e);
                }
            }
        }

        (batch, rejected)
    }
}

/// Outcome of a project run
#[derive(Debug, Default)]
pub struct ProjectResult {
    pub outputs: BTreeMap<GenerationKind, GenerationResult>,
    pub failures: BTreeMap<GenerationKind, IronError>,
}

impl ProjectResult {
    /// True when every attempted kind succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn any_succeeded(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Record failures found before dispatch (e.g. invalid options)
    pub fn add_failures(&mut self, failures: BTreeMap<GenerationKind, IronError>) {
        self.failures.extend(failures);
    }
}

/// Run a batch, dispatching each kind in order
pub fn run_project(dispatcher: &Dispatcher, batch: &ProjectRequest) -> ProjectResult {
    run_project_with(dispatcher, batch, |_, _| {})
}

/// Run a batch, calling `observe` after every attempt
pub fn run_project_with<F>(
    dispatcher: &Dispatcher,
    batch: &ProjectRequest,
    mut observe: F,
) -> ProjectResult
where
    F: FnMut(&GenerationRequest, &Result<GenerationResult>),
{
    let mut result = ProjectResult::default();

    for request in batch.iter() {
        let kind = request.kind();
        info!(kind = %kind, "project: generating");
        let outcome = dispatcher.dispatch(request);
        observe(request, &outcome);
        match outcome {
            Ok(generated) => {
                result.outputs.insert(kind, generated);
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "project: generation failed, continuing");
                result.failures.insert(kind, e);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("iron_project_test_{}", uuid::Uuid::new_v4()))
    }

    fn full_batch() -> ProjectRequest {
        let mut batch = ProjectRequest::new();
        batch.insert(GenerationRequest::with_defaults(GenerationKind::Video, "clouds"));
        batch.insert(GenerationRequest::with_defaults(GenerationKind::Text, "a story"));
        batch.insert(GenerationRequest::with_defaults(GenerationKind::Audio, "waves"));
        batch.insert(GenerationRequest::with_defaults(GenerationKind::Image, "a city"));
        batch
    }

    #[test]
    fn test_runs_in_fixed_order() {
        let dir = temp_dir();
        let dispatcher = Dispatcher::new(GeneratorConfig::default().with_output_dir(&dir));

        let mut seen = Vec::new();
        let result = run_project_with(&dispatcher, &full_batch(), |req, _| seen.push(req.kind()));

        assert_eq!(seen, GenerationKind::ALL.to_vec());
        assert!(result.is_complete());
        assert_eq!(result.outputs.len(), 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_disabled_kind_does_not_abort_batch() {
        let dir = temp_dir();
        let mut config = GeneratorConfig::default().with_output_dir(&dir);
        config.set_enabled(GenerationKind::Audio, false);
        let dispatcher = Dispatcher::new(config);

        let result = run_project(&dispatcher, &full_batch());

        assert!(!result.is_complete());
        assert!(result.any_succeeded());
        assert!(matches!(
            result.failures.get(&GenerationKind::Audio),
            Some(IronError::InvalidRequest(_))
        ));
        for kind in [GenerationKind::Text, GenerationKind::Image, GenerationKind::Video] {
            assert!(result.outputs[&kind].output_path.exists(), "{} missing", kind);
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_document() {
        let dir = temp_dir();
        let dispatcher = Dispatcher::new(GeneratorConfig::default().with_output_dir(&dir));
        let doc = ProjectDocument::from_json(
            r#"{
                "prompts": {"text": "a story", "image": "a cover", "audio": "a theme", "hologram": "?"},
                "params": {
                    "image_params": {"size": "800x600", "style": "cartoon"},
                    "audio": {"type": "music", "duration": 30},
                    "text_params": {"temperature": 3}
                }
            }"#,
        )
        .unwrap();

        let (batch, rejected) = ProjectRequest::from_document(&doc, &dispatcher);
        assert_eq!(batch.kinds(), vec![GenerationKind::Image, GenerationKind::Audio]);
        assert!(rejected.contains_key(&GenerationKind::Text));

        let image = batch.get(GenerationKind::Image).unwrap();
        assert_eq!(image.prompt(), "a cover");
        assert_eq!(image.options().to_map().unwrap()["size"], "800x600");
    }

    #[test]
    fn test_params_must_be_objects() {
        let doc = ProjectDocument::from_json(r#"{"prompts": {}, "params": {"video_params": 5}}"#)
            .unwrap();
        assert!(doc.params_for(GenerationKind::Video).is_err());
        assert!(doc.params_for(GenerationKind::Text).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_failure() {
        let err = ProjectDocument::load(&temp_dir().join("project.json")).unwrap_err();
        assert!(matches!(err, IronError::IoFailure(_)));
    }
}
