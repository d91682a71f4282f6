//! Output path allocation
//!
//! Names follow `{kind}_{YYYYmmdd_HHMMSS}.{ext}`. When that name (or its
//! sidecar) is taken, `_{n}` is appended before the extension. Files are
//! opened create-new, so an existing artifact is never overwritten even if
//! another process races for the same name.

use crate::kind::GenerationKind;
use iron_core::{IronError, Result};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_SUFFIX: u32 = 10_000;

/// Claim a fresh output file in `dir`
pub(crate) fn allocate(
    dir: &Path,
    kind: GenerationKind,
    stamp: &str,
    extension: &str,
) -> Result<(PathBuf, File)> {
    for seq in 0..MAX_SUFFIX {
        let name = if seq == 0 {
            format!("{}_{}.{}", kind, stamp, extension)
        } else {
            format!("{}_{}_{}.{}", kind, stamp, seq, extension)
        };
        let path = dir.join(name);

        if sidecar_path(&path).exists() {
            debug!(path = %path.display(), "sidecar already present, trying next suffix");
            continue;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "output name taken, trying next suffix");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(IronError::IoFailure(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "no free output name for {} at {} in {}",
            kind,
            stamp,
            dir.display()
        ),
    )))
}

/// Sidecar location for an output file: the full file name plus `.json`
pub(crate) fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}
