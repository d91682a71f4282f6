//! Project mode (`iron project --config project.json`)

use anyhow::{anyhow, bail, Result};
use iron_gen::{GenerationKind, ProjectDocument, Session};
use std::path::Path;

use super::generate::print_result;

pub fn run(session: &mut Session, config: Option<&Path>) -> Result<()> {
    let path = config.ok_or_else(|| anyhow!("--config required for project mode"))?;
    let doc = ProjectDocument::load(path)?;

    println!("Generating project from {}", path.display());
    let result = session.run_document(&doc);

    for kind in GenerationKind::ALL {
        if let Some(output) = result.outputs.get(&kind) {
            println!("{}:", kind);
            print_result(output);
        } else if let Some(err) = result.failures.get(&kind) {
            println!("{}:", kind);
            println!("  FAILED: {}", err);
        }
    }

    let attempted = result.outputs.len() + result.failures.len();
    println!(
        "\nProject: {}/{} generated, {} failed",
        result.outputs.len(),
        attempted,
        result.failures.len()
    );

    if !result.any_succeeded() {
        bail!("no content was generated for project {}", path.display());
    }
    println!(
        "All files saved to: {}/",
        session.dispatcher().output_dir().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iron_gen::{Dispatcher, GeneratorConfig};
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("iron_cli_project_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn session(config: GeneratorConfig) -> Session {
        Session::new(Dispatcher::new(config))
    }

    #[test]
    fn test_config_is_required() {
        let mut s = session(GeneratorConfig::default());
        let err = run(&mut s, None).unwrap_err();
        assert!(err.to_string().contains("--config required"));
    }

    #[test]
    fn test_partial_project_succeeds() {
        let dir = temp_dir();
        let doc = dir.join("project.json");
        std::fs::write(
            &doc,
            r#"{"prompts": {"text": "intro", "video": "trailer"}, "params": {"video_params": {"fps": 0}}}"#,
        )
        .unwrap();

        let mut s = session(GeneratorConfig::default().with_output_dir(dir.join("out")));
        run(&mut s, Some(&doc)).unwrap();
        assert_eq!(s.history().len(), 2);
        let failed: Vec<_> = s.history().entries().iter().filter(|e| !e.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].kind, GenerationKind::Video);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_project_with_nothing_generated_fails() {
        let dir = temp_dir();
        let doc = dir.join("project.json");
        std::fs::write(&doc, r#"{"prompts": {"image": "cover"}}"#).unwrap();

        let mut config = GeneratorConfig::default().with_output_dir(dir.join("out"));
        config.set_enabled(GenerationKind::Image, false);
        let mut s = session(config);
        assert!(run(&mut s, Some(&doc)).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
