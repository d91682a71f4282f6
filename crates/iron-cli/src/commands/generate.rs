//! Single-kind generation (`iron text|image|audio|video <prompt>`)

use anyhow::{bail, Result};
use iron_gen::{GenerationKind, GenerationResult, OptionMap, Session};
use serde_json::Value;

/// Option flags shared by every mode. Flags a kind does not use are ignored.
#[derive(Debug, Clone, Default)]
pub struct OptionFlags {
    pub style: Option<String>,
    pub audio_type: Option<String>,
    pub duration: Option<String>,
    pub size: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<u32>,
    pub format: Option<String>,
    pub voice: Option<String>,
    pub max_length: Option<u32>,
    pub temperature: Option<f64>,
}

impl OptionFlags {
    /// Convert the supplied flags into a raw option map
    pub fn to_option_map(&self) -> OptionMap {
        let mut map = OptionMap::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put("style", self.style.clone().map(Value::from));
        put("type", self.audio_type.clone().map(Value::from));
        put("duration", self.duration.as_deref().map(duration_value));
        put("size", self.size.clone().map(Value::from));
        put("resolution", self.resolution.clone().map(Value::from));
        put("fps", self.fps.map(Value::from));
        put("format", self.format.clone().map(Value::from));
        put("voice", self.voice.clone().map(Value::from));
        put("max_length", self.max_length.map(Value::from));
        put("temperature", self.temperature.map(number_value));
        map
    }
}

/// Finite numbers become JSON numbers; anything else (e.g. "auto") stays a string
fn duration_value(raw: &str) -> Value {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Value::from(n),
        _ => Value::from(raw.trim()),
    }
}

/// JSON has no NaN or infinity; keep them as text so validation rejects them
fn number_value(n: f64) -> Value {
    if n.is_finite() {
        Value::from(n)
    } else {
        Value::from(n.to_string())
    }
}

pub fn run(
    session: &mut Session,
    kind: GenerationKind,
    prompt: Option<&str>,
    flags: &OptionFlags,
) -> Result<()> {
    let Some(prompt) = prompt else {
        bail!("prompt required for {} mode", kind);
    };

    let request = session.request(kind, prompt, &flags.to_option_map())?;

    println!("Generating {}...", kind);
    if let Some(handler) = session.dispatcher().handler(kind) {
        for line in handler.summary(&request) {
            println!("  {}", line);
        }
    }

    let result = session.generate(&request)?;
    print_result(&result);
    Ok(())
}

pub fn print_result(result: &GenerationResult) {
    println!("  Output: {}", result.output_path.display());
    if let Some(sidecar) = &result.sidecar_path {
        println!("  Metadata: {}", sidecar.display());
    }
}
