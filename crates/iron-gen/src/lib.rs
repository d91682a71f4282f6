//! Iron Gen - Generation-request dispatcher
//!
//! Validates per-kind options for text, image, audio and video requests,
//! writes a placeholder artifact plus JSON sidecar under a unique,
//! timestamp-qualified path, and records every attempt in a session history.
//! Real generation back-ends plug in through the `KindHandler` trait.

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod history;
pub mod kind;
pub mod options;
mod output;
pub mod project;
pub mod request;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::GeneratorConfig;
pub use dispatcher::Dispatcher;
pub use handler::{HandlerRegistry, KindHandler, Payload};
pub use history::{EntryStatus, History, HistoryEntry, HistoryOrder};
pub use kind::GenerationKind;
pub use options::{
    AudioDuration, AudioFormat, AudioOptions, AudioType, Dimensions, GenerationOptions,
    ImageFormat, ImageOptions, OptionMap, Seconds, TextOptions, TextStyle, VideoFormat,
    VideoOptions, VisualStyle, Voice,
};
pub use project::{run_project, run_project_with, ProjectDocument, ProjectRequest, ProjectResult};
pub use request::{GenerationRequest, GenerationResult, Metadata};
pub use session::Session;
