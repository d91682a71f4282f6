//! Placeholder handlers
//!
//! Stand-ins for real generation back-ends. Text gets a templated body;
//! image, audio and video get an empty file plus a metadata sidecar.

mod audio;
mod image;
mod text;
mod video;

pub use audio::AudioHandler;
pub use image::ImageHandler;
pub use text::TextHandler;
pub use video::VideoHandler;

use crate::kind::GenerationKind;
use crate::request::GenerationRequest;
use iron_core::IronError;
use serde::Serialize;

fn wrong_kind(expected: GenerationKind, request: &GenerationRequest) -> IronError {
    IronError::invalid(format!(
        "{} handler cannot serve a {} request",
        expected,
        request.kind()
    ))
}

/// The serialized name of an option value, e.g. `sound_effect`
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}
