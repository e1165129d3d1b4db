//! Background removal on encoded frame files.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::foundation::error::{RetroError, RetroResult};
use crate::io::frames::list_frame_files;

/// Turns one encoded image into an encoded image whose background is transparent.
pub trait Matte: Send + Sync {
    /// Remove the background from `encoded`, returning the new encoded image.
    fn remove_background(&self, encoded: &[u8]) -> RetroResult<Vec<u8>>;
}

/// Leaves frames untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughMatte;

impl Matte for PassThroughMatte {
    fn remove_background(&self, encoded: &[u8]) -> RetroResult<Vec<u8>> {
        Ok(encoded.to_vec())
    }
}

/// Pipes each frame through an external program: encoded image on stdin, RGBA PNG on stdout.
///
/// Any tool with that contract works, e.g. `rembg i - -`.
#[derive(Clone, Debug)]
pub struct CommandMatte {
    program: String,
    args: Vec<String>,
}

impl CommandMatte {
    /// Command `program` with `args`.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a command line split on whitespace; `None` when it is empty.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Matte for CommandMatte {
    fn remove_background(&self, encoded: &[u8]) -> RetroResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RetroError::media(format!(
                    "failed to spawn matting command '{}': {e}",
                    self.program
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RetroError::media("failed to open matting command stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RetroError::media("failed to open matting command stderr"))?;

        let input = encoded.to_vec();
        let feeder = std::thread::spawn(move || stdin.write_all(&input));
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes).map(|_| bytes)
        });

        let mut stdout = Vec::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_end(&mut stdout)
                .context("read matting command stdout")?;
        }
        let status = child.wait().context("wait for matting command")?;

        let fed = feeder
            .join()
            .map_err(|_| RetroError::media("matting stdin writer panicked"))?;
        let stderr = stderr_drain
            .join()
            .map_err(|_| RetroError::media("matting stderr reader panicked"))?
            .unwrap_or_default();

        if !status.success() {
            return Err(RetroError::media(format!(
                "matting command '{}' exited with status {status}: {}",
                self.program,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        fed.context("write frame to matting command")?;
        if stdout.is_empty() {
            return Err(RetroError::media(format!(
                "matting command '{}' produced no output",
                self.program
            )));
        }
        Ok(stdout)
    }
}

/// Run every frame file in `in_dir` through `matte`, writing results under the same file names in
/// `out_dir`. Returns the number of frames written.
#[tracing::instrument(skip(matte))]
pub fn remove_background_dir(matte: &dyn Matte, in_dir: &Path, out_dir: &Path) -> RetroResult<usize> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create directory '{}'", out_dir.display()))?;
    let files = list_frame_files(in_dir)?;
    for path in &files {
        let bytes =
            std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
        let matted = matte.remove_background(&bytes).map_err(|e| {
            RetroError::media(format!("background removal failed for '{}': {e}", path.display()))
        })?;
        let Some(name) = path.file_name() else {
            continue;
        };
        let dst = out_dir.join(name);
        std::fs::write(&dst, matted).with_context(|| format!("write frame '{}'", dst.display()))?;
        tracing::debug!(frame = %dst.display(), "background removed");
    }
    Ok(files.len())
}

#[cfg(test)]
#[path = "../../tests/unit/media/matte.rs"]
mod tests;
