use std::path::PathBuf;

use anyhow::Context;

use crate::{
    animation::timing::StepClock,
    encode::sink::{FileSink, FrameSink, SinkConfig},
    foundation::{
        core::FrameIndex,
        error::{TutoError, TutoResult},
    },
    pipeline::config::GeneratorConfig,
    render::{frame::FrameRGBA, overlay::compose_frame},
    scene::{
        builder::{Scene, SceneAssets, build_scene},
        model::{ArtifactDef, TutorialDef},
        steps::StepDef,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArtifactStats {
    pub frames: u64,
    pub steps: usize,
}

fn clock_for(step: &StepDef, fps: f64, start: FrameIndex) -> StepClock {
    StepClock::new(start, step.animated_frames(fps), step.hold(fps), step.ease)
}

/// Render every frame of `step` starting at absolute index `start` and push it to `sink`.
///
/// Returns the number of frames emitted: the animated sub-frames (at least one) plus the hold.
pub fn run_step(
    scene: &Scene,
    step: &StepDef,
    fps: f64,
    start: FrameIndex,
    sink: &mut dyn FrameSink,
) -> TutoResult<u64> {
    let mut emitted = 0u64;
    for ctx in clock_for(step, fps, start) {
        let frame = compose_frame(scene, &step.overlays, &ctx)?;
        sink.push_frame(ctx.index, &frame)?;
        emitted += 1;
    }
    tracing::trace!(step = %step.name, frames = emitted, "step rendered");
    Ok(emitted)
}

/// Number of frames `artifact` produces at `fps`, without rendering.
pub fn plan_frame_count(artifact: &ArtifactDef, fps: f64) -> u64 {
    artifact.steps.iter().map(|s| s.total_frames(fps)).sum()
}

/// Build the scene of `artifact` and stream all of its frames, in step order, into `sink`.
#[tracing::instrument(skip_all, fields(tutorial = %def.name, artifact = %artifact.file))]
pub fn render_artifact(
    def: &TutorialDef,
    artifact: &ArtifactDef,
    assets: &mut SceneAssets,
    sink: &mut dyn FrameSink,
) -> TutoResult<ArtifactStats> {
    let scene = build_scene(def, artifact, assets)?;
    let canvas = scene.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        frame_ms: def.frame_ms(artifact),
        encoding: artifact.encoding,
    })?;

    let mut stats = ArtifactStats::default();
    for step in &artifact.steps {
        stats.frames += run_step(&scene, step, def.fps, FrameIndex(stats.frames), sink)?;
        stats.steps += 1;
    }
    sink.end()?;

    tracing::debug!(
        frames = stats.frames,
        steps = stats.steps,
        font = %scene.font(),
        "artifact rendered"
    );
    Ok(stats)
}

/// Write every artifact of `def` under `cfg.out_dir`; returns the written paths in order.
pub fn generate(def: &TutorialDef, cfg: &GeneratorConfig) -> TutoResult<Vec<PathBuf>> {
    def.validate()?;
    std::fs::create_dir_all(&cfg.out_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            cfg.out_dir.display()
        )
    })?;

    let mut assets = cfg.scene_assets();
    let mut written = Vec::with_capacity(def.artifacts.len());
    for artifact in &def.artifacts {
        let path = cfg.out_dir.join(&artifact.file);
        let mut sink = FileSink::new(&path);
        let stats = render_artifact(def, artifact, &mut assets, &mut sink)?;
        tracing::info!(
            tutorial = %def.name,
            path = %path.display(),
            frames = stats.frames,
            "generated"
        );
        written.push(path);
    }
    Ok(written)
}

/// Render frame `frame` of artifact number `artifact_idx` on its own.
pub fn render_single_frame(
    def: &TutorialDef,
    artifact_idx: usize,
    frame: u64,
    assets: &mut SceneAssets,
) -> TutoResult<FrameRGBA> {
    def.validate()?;
    let artifact = def.artifacts.get(artifact_idx).ok_or_else(|| {
        TutoError::validation(format!(
            "artifact index {artifact_idx} out of range ({} artifacts)",
            def.artifacts.len()
        ))
    })?;
    let total = plan_frame_count(artifact, def.fps);
    if frame >= total {
        return Err(TutoError::validation(format!(
            "frame {frame} out of range ('{}' has {total} frames)",
            artifact.file
        )));
    }

    let scene = build_scene(def, artifact, assets)?;
    let mut start = 0u64;
    for step in &artifact.steps {
        let n = step.total_frames(def.fps);
        if frame < start + n {
            let ctx = clock_for(step, def.fps, FrameIndex(start))
                .nth((frame - start) as usize)
                .ok_or_else(|| TutoError::render(format!("frame {frame} missing from step clock")))?;
            return compose_frame(&scene, &step.overlays, &ctx);
        }
        start += n;
    }
    Err(TutoError::render(format!("frame {frame} not covered by any step")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/executor.rs"]
mod tests;
