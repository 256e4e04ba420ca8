// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rendered units and their output files.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio}
};

use tracing::{debug, warn};

use crate::{
    error::{GenerateError, Result},
    utils::marker
};

/// One entity's rendered repository source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Entity name.
    pub entity:    String,
    /// Output file name, `<entity_snake>_repo.rs`.
    pub file_name: String,
    /// Source text, header comment included.
    pub source:    String
}

/// Format Rust source with `rustfmt`.
///
/// Returns `code` unchanged when `rustfmt` is missing or rejects the input.
pub fn format_code(code: &str) -> String {
    match run_rustfmt(code) {
        Ok(Some(formatted)) => formatted,
        Ok(None) => code.to_owned(),
        Err(err) => {
            debug!(error = %err, "rustfmt unavailable, keeping unformatted source");
            code.to_owned()
        }
    }
}

fn run_rustfmt(code: &str) -> io::Result<Option<String>> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2024", "--emit", "stdout"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(String::from_utf8(output.stdout).ok())
}

/// Write every unit into `dir`, creating it when missing.
///
/// Existing files are only replaced when they carry the generated marker.
///
/// # Errors
///
/// [`GenerateError::Io`] for the first file that cannot be written, or that
/// exists without the marker.
pub fn write_units(dir: impl AsRef<Path>, units: &[Unit]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let path = dir.join(&unit.file_name);
        if let Ok(existing) = fs::read_to_string(&path)
            && !marker::is_generated(&existing)
        {
            warn!(path = %path.display(), "refusing to overwrite hand-written file");
            return Err(io_error(
                &path,
                io::Error::new(io::ErrorKind::AlreadyExists, "file is not generated")
            ));
        }
        fs::write(&path, &unit.source).map_err(|source| io_error(&path, source))?;
        debug!(entity = %unit.entity, path = %path.display(), "unit written");
        written.push(path);
    }
    Ok(written)
}

fn io_error(path: &Path, source: io::Error) -> GenerateError {
    GenerateError::Io {
        path: path.to_path_buf(),
        source
    }
}
