use super::{label, wrong_kind};
use crate::handler::{KindHandler, Payload};
use crate::kind::GenerationKind;
use crate::options::GenerationOptions;
use crate::request::GenerationRequest;
use chrono::{DateTime, Local};
use iron_core::Result;

/// Writes a templated placeholder body that embeds the prompt and parameters
#[derive(Debug, Default, Clone, Copy)]
pub struct TextHandler;

impl KindHandler for TextHandler {
    fn name(&self) -> &str {
        "placeholder-text"
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::Text
    }

    fn render(
        &self,
        request: &GenerationRequest,
        generated_at: &DateTime<Local>,
    ) -> Result<Payload> {
        let GenerationOptions::Text(opts) = request.options() else {
            return Err(wrong_kind(GenerationKind::Text, request));
        };
        let body = format!(
            "Generated Text (Prompt: \"{prompt}\")\n\
             \n\
             Style: {style}\n\
             Temperature: {temperature}\n\
             Max Length: {max_length}\n\
             \n\
             [Placeholder Content]\n\
             No text generation back-end is configured. A real back-end would\n\
             write up to {max_length} tokens here based on your prompt:\n\
             \"{prompt}\"\n\
             \n\
             Generated at: {at}\n",
            prompt = request.prompt(),
            style = label(&opts.style),
            temperature = opts.temperature,
            max_length = opts.max_length,
            at = generated_at.format("%Y-%m-%d %H:%M:%S"),
        );
        Ok(Payload::Body(body))
    }

    fn summary(&self, request: &GenerationRequest) -> Vec<String> {
        match request.options() {
            GenerationOptions::Text(opts) => vec![
                format!("Prompt: {}", request.prompt()),
                format!(
                    "Style: {}, Temperature: {}, Max length: {}",
                    label(&opts.style),
                    opts.temperature,
                    opts.max_length
                ),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{TextOptions, TextStyle};
    use chrono::TimeZone;

    #[test]
    fn test_body_embeds_prompt_and_parameters() {
        let request = GenerationRequest::new(
            "a lighthouse keeper's diary",
            GenerationOptions::Text(TextOptions {
                style: TextStyle::Poetic,
                max_length: 120,
                temperature: 0.3,
            }),
        );
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let Payload::Body(body) = TextHandler.render(&request, &at).unwrap() else {
            panic!("text handler must produce a body");
        };
        assert!(body.contains("a lighthouse keeper's diary"));
        assert!(body.contains("Style: poetic"));
        assert!(body.contains("Temperature: 0.3"));
        assert!(body.contains("Max Length: 120"));
        assert!(body.contains("Generated at: 2024-05-01 12:00:00"));
    }

    #[test]
    fn test_rejects_other_kinds() {
        let request = GenerationRequest::with_defaults(GenerationKind::Image, "a cat");
        let at = Local::now();
        assert!(TextHandler.render(&request, &at).is_err());
        assert!(TextHandler.summary(&request).is_empty());
    }
}
