use std::path::Path;

use anyhow::Context;
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::Frame;
use crate::io::frames::{list_frame_files, read_frame, write_frame};
use crate::style::engine::StyleEngine;
use crate::style::legacy_edge::EdgeParams;
use crate::style::spec::{CUSTOM_STYLE, StyleSpec};

/// What to apply to each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleRequest {
    /// A registered style; `None` selects the registry default.
    Named(Option<String>),
    /// Caller-supplied parameters; `None` falls back to the default style.
    Custom(Option<StyleSpec>),
    /// The edge-detection style.
    LegacyEdge(EdgeParams),
}

impl Default for StyleRequest {
    fn default() -> Self {
        Self::Named(None)
    }
}

impl StyleRequest {
    /// Stylize one in-memory frame.
    pub fn apply<R: rand::Rng + ?Sized>(
        &self,
        engine: &StyleEngine,
        frame: &Frame,
        rng: &mut R,
    ) -> RetroResult<Frame> {
        match self {
            Self::Named(name) => engine.process(frame, name.as_deref(), None, rng),
            Self::Custom(spec) => engine.process(frame, Some(CUSTOM_STYLE), spec.as_ref(), rng),
            Self::LegacyEdge(params) => engine.process_legacy_edge(frame, params, rng),
        }
    }

    /// Label for logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(Some(name)) => name.as_str(),
            Self::Named(None) => "default",
            Self::Custom(_) => CUSTOM_STYLE,
            Self::LegacyEdge(_) => crate::style::spec::LEGACY_EDGE_STYLE,
        }
    }
}

/// Worker configuration for [`stylize_dir`].
#[derive(Clone, Debug, Default)]
pub struct Threading {
    /// Process frames on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Pool size; `None` lets rayon choose.
    pub threads: Option<usize>,
}

impl Threading {
    // A worker count of 0 asks rayon for its default size.
    fn pool(&self) -> RetroResult<rayon::ThreadPool> {
        let workers = match self.threads {
            Some(0) => return Err(RetroError::validation("frame worker count must be >= 1")),
            Some(n) => n,
            None => 0,
        };
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("retroframe-frame-{i}"))
            .build()
            .map_err(|e| RetroError::validation(format!("cannot start frame workers: {e}")))
    }
}

/// What to do when one frame fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameErrorPolicy {
    /// Stop and return the first error (in frame order).
    #[default]
    Abort,
    /// Log the error and carry on with the remaining frames.
    Skip,
}

/// Options for [`stylize_dir`].
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Sequential or parallel processing.
    pub threading: Threading,
    /// Base seed mixed with the frame index per frame. `None` seeds every frame from entropy.
    pub seed: Option<u64>,
    /// Per-frame failure handling.
    pub on_error: FrameErrorPolicy,
}

/// Counters reported by [`stylize_dir`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Frame files found in the input directory.
    pub frames_total: u64,
    /// Frames written to the output directory.
    pub frames_styled: u64,
    /// Frames that failed and were skipped.
    pub frames_skipped: u64,
}

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random generator for frame `index`. With a seed, distinct `(seed, index)` pairs get distinct
/// streams.
pub fn frame_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_mul(SEED_MIX) ^ index as u64),
        None => StdRng::from_entropy(),
    }
}

/// Read `input`, stylize it, and write the result to `output`.
pub fn stylize_file<R: rand::Rng + ?Sized>(
    engine: &StyleEngine,
    request: &StyleRequest,
    input: &Path,
    output: &Path,
    rng: &mut R,
) -> RetroResult<()> {
    let frame = read_frame(input)?;
    let styled = request.apply(engine, &frame, rng)?;
    write_frame(output, &styled)
}

/// Stylize every frame file in `in_dir` into `out_dir`, keeping file names.
#[tracing::instrument(skip(engine, request, opts), fields(style = request.label()))]
pub fn stylize_dir(
    engine: &StyleEngine,
    in_dir: &Path,
    out_dir: &Path,
    request: &StyleRequest,
    opts: &BatchOptions,
) -> RetroResult<BatchStats> {
    let files = list_frame_files(in_dir)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
    if files.is_empty() {
        tracing::warn!(dir = %in_dir.display(), "no frame files found");
        return Ok(BatchStats::default());
    }

    let one = |idx: usize, path: &Path| -> RetroResult<()> {
        let name = path
            .file_name()
            .ok_or_else(|| RetroError::validation(format!("'{}' has no file name", path.display())))?;
        let mut rng = frame_rng(opts.seed, idx);
        stylize_file(engine, request, path, &out_dir.join(name), &mut rng)?;
        tracing::debug!(frame = %path.display(), "frame stylized");
        Ok(())
    };

    let results: Vec<RetroResult<()>> = if opts.threading.parallel {
        let pool = opts.threading.pool()?;
        pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(idx, path)| one(idx, path.as_path()))
                .collect()
        })
    } else {
        let mut results = Vec::with_capacity(files.len());
        for (idx, path) in files.iter().enumerate() {
            let r = one(idx, path.as_path());
            let failed = r.is_err();
            results.push(r);
            if failed && opts.on_error == FrameErrorPolicy::Abort {
                break;
            }
        }
        results
    };

    let mut stats = BatchStats {
        frames_total: files.len() as u64,
        ..BatchStats::default()
    };
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(()) => stats.frames_styled += 1,
            Err(e) if opts.on_error == FrameErrorPolicy::Skip => {
                tracing::warn!(frame = %path.display(), error = %e, "skipping frame");
                stats.frames_skipped += 1;
            }
            Err(e) => {
                tracing::error!(frame = %path.display(), error = %e, "frame failed");
                return Err(e);
            }
        }
    }
    tracing::info!(
        styled = stats.frames_styled,
        skipped = stats.frames_skipped,
        "stylization finished"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
