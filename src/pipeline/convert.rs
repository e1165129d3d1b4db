//! End-to-end video conversion: extract, matte, stylize, reassemble, clean up.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::app::AppConfig;
use crate::foundation::error::{RetroError, RetroResult};
use crate::media::ffmpeg::{extract_frames, reassemble_video};
use crate::media::matte::{Matte, remove_background_dir};
use crate::pipeline::batch::{BatchOptions, BatchStats, StyleRequest, stylize_dir};
use crate::style::engine::StyleEngine;

/// Which artifacts of a conversion are kept.
///
/// Intermediate directories that are not kept are deleted after a successful run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Keep the frames extracted from the video.
    pub keep_original_frames: bool,
    /// Keep the background-removed frames.
    pub keep_matted_frames: bool,
    /// Keep the stylized frames.
    pub keep_processed_frames: bool,
    /// Reassemble the stylized frames into an MP4.
    pub create_video: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            keep_original_frames: false,
            keep_matted_frames: true,
            keep_processed_frames: false,
            create_video: true,
        }
    }
}

impl ExportOptions {
    /// Whether anything at all is requested.
    pub fn any(&self) -> bool {
        self.keep_original_frames
            || self.keep_matted_frames
            || self.keep_processed_frames
            || self.create_video
    }

    /// Whether the background-removal stage runs.
    pub fn needs_matting(&self) -> bool {
        self.keep_matted_frames || self.needs_stylizing()
    }

    /// Whether the stylization stage runs.
    pub fn needs_stylizing(&self) -> bool {
        self.keep_processed_frames || self.create_video
    }
}

/// Where one job puts its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobLayout {
    /// `<output_dir>/<name>`
    pub frames_dir: PathBuf,
    /// `<output_dir>/<name>_nobg`
    pub matted_dir: PathBuf,
    /// `<processed_dir>/<name>`
    pub processed_dir: PathBuf,
    /// `<final_video_dir>/<name>_final.mp4`
    pub video_path: PathBuf,
}

impl JobLayout {
    /// Layout for job `name` under `root` using the directory names from `cfg`.
    pub fn new(root: &Path, cfg: &AppConfig, name: &str) -> Self {
        Self {
            frames_dir: root.join(&cfg.output_dir).join(name),
            matted_dir: root.join(&cfg.output_dir).join(format!("{name}_nobg")),
            processed_dir: root.join(&cfg.processed_dir).join(name),
            video_path: root
                .join(&cfg.final_video_dir)
                .join(format!("{name}_final.mp4")),
        }
    }
}

/// Summary of a finished [`ConvertJob`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobReport {
    /// Paths used by the job.
    pub layout: JobLayout,
    /// Frames written by background removal.
    pub frames_matted: usize,
    /// Stylization counters, when that stage ran.
    pub stylize: Option<BatchStats>,
    /// Final video, when one was created.
    pub video: Option<PathBuf>,
    /// Intermediate directories deleted after the run.
    pub removed: Vec<PathBuf>,
}

/// One video conversion.
#[derive(Clone, Debug)]
pub struct ConvertJob {
    /// Input video.
    pub video: PathBuf,
    /// Job name; names the frame directories and the final video.
    pub name: String,
    /// Extraction and reassembly frame rate.
    pub fps: u32,
    /// Directory the configured output directories are relative to.
    pub root: PathBuf,
    /// Artifacts to keep.
    pub export: ExportOptions,
    /// Style applied to each frame.
    pub request: StyleRequest,
    /// Stylization worker options.
    pub batch: BatchOptions,
    /// Replace an existing final video.
    pub overwrite: bool,
}

impl ConvertJob {
    /// Job for `video` with the name and frame rate taken from `cfg`.
    pub fn new(video: impl Into<PathBuf>, cfg: &AppConfig) -> Self {
        Self {
            video: video.into(),
            name: cfg.sub_directory.clone(),
            fps: cfg.fps,
            root: PathBuf::from("."),
            export: ExportOptions::default(),
            request: StyleRequest::default(),
            batch: BatchOptions::default(),
            overwrite: false,
        }
    }

    /// Paths this job will use.
    pub fn layout(&self, cfg: &AppConfig) -> JobLayout {
        JobLayout::new(&self.root, cfg, &self.name)
    }

    /// Check the job before touching the filesystem.
    pub fn validate(&self, cfg: &AppConfig) -> RetroResult<()> {
        if !self.export.any() {
            return Err(RetroError::validation(
                "no export option selected; nothing to do",
            ));
        }
        if self.name.trim().is_empty() || self.name.contains(['/', '\\']) {
            return Err(RetroError::validation(format!(
                "invalid job name '{}'",
                self.name
            )));
        }
        if self.fps == 0 {
            return Err(RetroError::validation("fps must be non-zero"));
        }
        let video_path = self.layout(cfg).video_path;
        if self.export.create_video && !self.overwrite && video_path.exists() {
            return Err(RetroError::validation(format!(
                "output video '{}' already exists (pass overwrite to replace it)",
                video_path.display()
            )));
        }
        Ok(())
    }

    /// Run every stage the export options require.
    #[tracing::instrument(skip_all, fields(job = %self.name))]
    pub fn run(
        &self,
        cfg: &AppConfig,
        engine: &StyleEngine,
        matte: &dyn Matte,
    ) -> RetroResult<JobReport> {
        self.validate(cfg)?;
        let layout = self.layout(cfg);

        tracing::info!(video = %self.video.display(), fps = self.fps, "extracting frames");
        extract_frames(&self.video, self.fps, &layout.frames_dir)?;

        let mut frames_matted = 0;
        if self.export.needs_matting() {
            tracing::info!("removing background");
            frames_matted = remove_background_dir(matte, &layout.frames_dir, &layout.matted_dir)?;
        }

        let mut stylize = None;
        if self.export.needs_stylizing() {
            tracing::info!(style = self.request.label(), "applying style");
            stylize = Some(stylize_dir(
                engine,
                &layout.matted_dir,
                &layout.processed_dir,
                &self.request,
                &self.batch,
            )?);
        }

        let mut video = None;
        if self.export.create_video {
            tracing::info!(out = %layout.video_path.display(), "reassembling video");
            reassemble_video(
                &layout.processed_dir,
                self.fps,
                &layout.video_path,
                self.overwrite,
            )?;
            video = Some(layout.video_path.clone());
        }

        let removed = cleanup(&self.export, &layout);
        tracing::info!("conversion finished");
        Ok(JobReport {
            layout,
            frames_matted,
            stylize,
            video,
            removed,
        })
    }
}

/// Delete the intermediate directories `export` does not keep. Failures are logged, not returned.
pub(crate) fn cleanup(export: &ExportOptions, layout: &JobLayout) -> Vec<PathBuf> {
    let candidates = [
        (export.keep_original_frames, &layout.frames_dir),
        (export.keep_matted_frames, &layout.matted_dir),
        (export.keep_processed_frames, &layout.processed_dir),
    ];
    let mut removed = Vec::new();
    for (keep, dir) in candidates {
        if keep || !dir.exists() {
            continue;
        }
        match remove_dir(dir) {
            Ok(()) => removed.push(dir.clone()),
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "cleanup failed"),
        }
    }
    removed
}

fn remove_dir(dir: &Path) -> RetroResult<()> {
    std::fs::remove_dir_all(dir).with_context(|| format!("remove '{}'", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "removed intermediate frames");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/convert.rs"]
mod tests;
