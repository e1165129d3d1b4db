use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::foundation::error::{RetroError, RetroResult};

/// File name pattern shared by extraction and reassembly.
pub const FRAME_PATTERN: &str = "frame_%04d.png";

// libx264 with yuv420p needs even dimensions.
const EVEN_SCALE: &str = "scale=trunc(iw/2)*2:trunc(ih/2)*2";

/// Whether a runnable `ffmpeg` binary is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    ffmpeg_version().is_some()
}

// First line of `ffmpeg -version`, e.g. "ffmpeg version 6.1.1 ...".
fn ffmpeg_version() -> Option<String> {
    let out = ffmpeg().arg("-version").stderr(Stdio::null()).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

/// Create the directory that will hold `path`. A bare file name needs nothing.
pub fn ensure_parent_dir(path: &Path) -> RetroResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output dir '{}'", dir.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

// Quiet, non-interactive ffmpeg.
fn ffmpeg() -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-nostdin"]).stdin(Stdio::null());
    cmd
}

/// Decode `video` into `out_dir/frame_%04d.png` sampled at `fps` frames per second.
#[tracing::instrument(skip(out_dir))]
pub fn extract_frames(video: &Path, fps: u32, out_dir: &Path) -> RetroResult<()> {
    if fps == 0 {
        return Err(RetroError::validation("fps must be non-zero"));
    }
    if !video.is_file() {
        return Err(RetroError::validation(format!(
            "input video '{}' does not exist",
            video.display()
        )));
    }
    require_ffmpeg()?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create frame directory '{}'", out_dir.display()))?;

    let mut cmd = ffmpeg();
    cmd.args(["-v", "error", "-y", "-i"])
        .arg(video)
        .args(["-vf", &format!("fps={fps}")])
        .arg(out_dir.join(FRAME_PATTERN));
    run(cmd, "frame extraction")?;
    tracing::debug!(dir = %out_dir.display(), "frames extracted");
    Ok(())
}

/// Encode `in_dir/frame_%04d.png` at `fps` into an H.264 MP4 at `out`.
///
/// Without `overwrite`, an existing `out` is a validation error.
#[tracing::instrument(skip(in_dir))]
pub fn reassemble_video(in_dir: &Path, fps: u32, out: &Path, overwrite: bool) -> RetroResult<()> {
    if fps == 0 {
        return Err(RetroError::validation("fps must be non-zero"));
    }
    if !overwrite && out.exists() {
        return Err(RetroError::validation(format!(
            "output file '{}' already exists",
            out.display()
        )));
    }
    require_ffmpeg()?;
    ensure_parent_dir(out)?;

    let mut cmd = ffmpeg();
    cmd.args(["-v", "error", if overwrite { "-y" } else { "-n" }])
        .args(["-framerate", &fps.to_string(), "-i"])
        .arg(in_dir.join(FRAME_PATTERN))
        .args([
            "-vf",
            EVEN_SCALE,
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(out);
    run(cmd, "video reassembly")
}

fn require_ffmpeg() -> RetroResult<()> {
    match ffmpeg_version() {
        Some(version) => {
            tracing::debug!(%version, "using ffmpeg");
            Ok(())
        }
        None => Err(RetroError::media(
            "ffmpeg is required for video input/output, but was not found on PATH",
        )),
    }
}

fn run(mut cmd: Command, what: &str) -> RetroResult<()> {
    let out = cmd
        .output()
        .map_err(|e| RetroError::media(format!("failed to run ffmpeg for {what}: {e}")))?;
    if !out.status.success() {
        return Err(RetroError::media(format!(
            "ffmpeg {what} exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
