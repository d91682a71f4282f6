//! Session context
//!
//! Owns the dispatcher and the history log for one process or UI session and
//! records every attempt made through it.

use crate::dispatcher::Dispatcher;
use crate::history::{History, HistoryEntry, HistoryOrder};
use crate::kind::GenerationKind;
use crate::options::OptionMap;
use crate::project::{run_project_with, ProjectDocument, ProjectRequest, ProjectResult};
use crate::request::{GenerationRequest, GenerationResult};
use chrono::Local;
use iron_core::Result;

pub struct Session {
    dispatcher: Dispatcher,
    history: History,
}

impl Session {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            history: History::new(),
        }
    }

    /// Continue a session from a previously loaded history
    pub fn with_history(dispatcher: Dispatcher, history: History) -> Self {
        Self {
            dispatcher,
            history,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Build a request through the dispatcher.
    ///
    /// Invalid options are logged as a failed attempt before the error is returned.
    pub fn request(
        &mut self,
        kind: GenerationKind,
        prompt: &str,
        options: &OptionMap,
    ) -> Result<GenerationRequest> {
        let request = self.dispatcher.request(kind, prompt, options);
        if let Err(e) = &request {
            self.history
                .record(HistoryEntry::rejected(kind, prompt, e, Local::now()));
        }
        request
    }

    /// Dispatch one request and record the outcome
    pub fn generate(&mut self, request: &GenerationRequest) -> Result<GenerationResult> {
        let outcome = self.dispatcher.dispatch(request);
        self.history.record(entry_for(request, &outcome));
        outcome
    }

    /// Run a batch, recording one entry per attempted kind
    pub fn run_project(&mut self, batch: &ProjectRequest) -> ProjectResult {
        let history = &mut self.history;
        run_project_with(&self.dispatcher, batch, |request, outcome| {
            history.record(entry_for(request, outcome));
        })
    }

    /// Build and run a batch from a project document.
    ///
    /// Kinds rejected while building the batch are reported as failures too.
    pub fn run_document(&mut self, doc: &ProjectDocument) -> ProjectResult {
        let (batch, rejected) = ProjectRequest::from_document(doc, &self.dispatcher);
        for (kind, error) in &rejected {
            let prompt = doc.prompt_for(*kind).unwrap_or_default();
            self.history
                .record(HistoryEntry::rejected(*kind, prompt, error, Local::now()));
        }
        let mut result = self.run_project(&batch);
        result.add_failures(rejected);
        result
    }

    /// Query the history log
    pub fn query(&self, kinds: &[GenerationKind], order: HistoryOrder) -> Vec<HistoryEntry> {
        self.history.query(kinds, order)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn export_history(&self) -> Result<String> {
        self.history.export()
    }
}

fn entry_for(request: &GenerationRequest, outcome: &Result<GenerationResult>) -> HistoryEntry {
    match outcome {
        Ok(result) => HistoryEntry::success(request, result.clone()),
        Err(e) => HistoryEntry::failure(request, e, Local::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::history::EntryStatus;
    use std::path::{Path, PathBuf};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("iron_session_test_{}", uuid::Uuid::new_v4()))
    }

    fn session(dir: &Path) -> Session {
        Session::new(Dispatcher::new(GeneratorConfig::default().with_output_dir(dir)))
    }

    #[test]
    fn test_generate_records_success_and_failure() {
        let dir = temp_dir();
        let mut s = session(&dir);

        s.generate(&GenerationRequest::with_defaults(GenerationKind::Text, "hello"))
            .unwrap();
        assert!(s
            .generate(&GenerationRequest::with_defaults(GenerationKind::Image, ""))
            .is_err());

        let entries = s.query(&[], HistoryOrder::OldestFirst);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, EntryStatus::Success);
        assert!(entries[0].result.as_ref().unwrap().output_path.exists());
        assert_eq!(entries[1].status, EntryStatus::Failure);
        assert_eq!(entries[1].kind, GenerationKind::Image);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_history_query_after_text_then_image() {
        let dir = temp_dir();
        let mut s = session(&dir);
        s.generate(&GenerationRequest::with_defaults(GenerationKind::Text, "a poem"))
            .unwrap();
        s.generate(&GenerationRequest::with_defaults(GenerationKind::Image, "a cat"))
            .unwrap();

        let images = s.query(&[GenerationKind::Image], HistoryOrder::NewestFirst);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].prompt, "a cat");

        s.clear_history();
        assert!(s.history().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_options_are_logged_as_failures() {
        let dir = temp_dir();
        let mut s = session(&dir);

        let options = serde_json::json!({"temperature": 2.0});
        let err = s
            .request(GenerationKind::Text, "too hot", options.as_object().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("temperature"));

        let entries = s.query(&[], HistoryOrder::NewestFirst);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].prompt, "too hot");
        assert_eq!(entries[0].status, EntryStatus::Failure);
        assert!(!dir.exists());
    }

    #[test]
    fn test_with_history_continues_a_saved_log() {
        let dir = temp_dir();
        let path = dir.join("history.json");

        let mut first = session(&dir);
        first
            .generate(&GenerationRequest::with_defaults(GenerationKind::Text, "day one"))
            .unwrap();
        first.history().save(&path).unwrap();

        let dispatcher = Dispatcher::new(GeneratorConfig::default().with_output_dir(&dir));
        let mut second = Session::with_history(dispatcher, History::load(&path).unwrap());
        second
            .generate(&GenerationRequest::with_defaults(GenerationKind::Image, "day two"))
            .unwrap();

        let prompts: Vec<String> = second
            .query(&[], HistoryOrder::OldestFirst)
            .into_iter()
            .map(|e| e.prompt)
            .collect();
        assert_eq!(prompts, ["day one", "day two"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_document_records_every_attempt() {
        let dir = temp_dir();
        let mut config = GeneratorConfig::default().with_output_dir(&dir);
        config.set_enabled(GenerationKind::Video, false);
        let mut s = Session::new(Dispatcher::new(config));

        let doc = ProjectDocument::from_json(
            r#"{"prompts": {"text": "intro", "image": "cover", "video": "trailer", "audio": "jingle"},
                "params": {"audio_params": {"format": "flac"}}}"#,
        )
        .unwrap();
        let result = s.run_document(&doc);

        assert_eq!(result.outputs.len(), 2);
        assert!(result.failures.contains_key(&GenerationKind::Video));
        assert!(result.failures.contains_key(&GenerationKind::Audio));
        assert_eq!(s.history().len(), 4);

        let audio = s.query(&[GenerationKind::Audio], HistoryOrder::NewestFirst);
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].prompt, "jingle");
        assert_eq!(audio[0].status, EntryStatus::Failure);

        let exported = s.export_history().unwrap();
        assert!(exported.contains("\"trailer\""));

        std::fs::remove_dir_all(&dir).ok();
    }
}
