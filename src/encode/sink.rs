use std::path::PathBuf;

use crate::{
    encode::artifact::{WriteOptions, write_artifact},
    foundation::{
        core::FrameIndex,
        error::{TutoError, TutoResult},
    },
    render::frame::FrameRGBA,
    scene::model::EncodingDef,
};

/// Configuration provided to a [`FrameSink`] before the first frame of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display duration of every frame.
    pub frame_ms: u32,
    pub encoding: EncodingDef,
}

/// Sink contract for consuming rendered frames in display order.
///
/// Ordering contract: `push_frame` is called with strictly increasing [`FrameIndex`] values and
/// frames sized exactly `width`x`height` from the [`SinkConfig`].
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TutoResult<()>;
    /// Push one frame in display order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TutoResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TutoResult<()>;
}

fn check_push(
    cfg: Option<&SinkConfig>,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> TutoResult<()> {
    let Some(cfg) = cfg else {
        return Err(TutoError::encode("push_frame called before begin"));
    };
    if (frame.width, frame.height) != (cfg.width, cfg.height) {
        return Err(TutoError::encode(format!(
            "frame {} is {}x{}, artifact is {}x{}",
            idx.0, frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if last.is_some_and(|l| idx <= l) {
        return Err(TutoError::encode(format!(
            "frame {} pushed out of order",
            idx.0
        )));
    }
    frame.check_len()
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in display order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TutoResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TutoResult<()> {
        check_push(
            self.cfg.as_ref(),
            self.frames.last().map(|(i, _)| *i),
            idx,
            frame,
        )?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TutoResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Buffers an artifact's frames and writes the output file on [`FrameSink::end`].
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
    frames: Vec<FrameRGBA>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cfg: None,
            last: None,
            frames: Vec::new(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl FrameSink for FileSink {
    fn begin(&mut self, cfg: SinkConfig) -> TutoResult<()> {
        self.cfg = Some(cfg);
        self.last = None;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TutoResult<()> {
        check_push(self.cfg.as_ref(), self.last, idx, frame)?;
        self.last = Some(idx);
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> TutoResult<()> {
        let Some(cfg) = self.cfg.take() else {
            return Err(TutoError::encode("end called before begin"));
        };
        let frames = std::mem::take(&mut self.frames);
        let opts = WriteOptions {
            frame_ms: cfg.frame_ms,
            encoding: cfg.encoding,
        };
        write_artifact(&frames, &self.path, &opts)?;
        tracing::info!(
            path = %self.path.display(),
            frames = frames.len(),
            width = cfg.width,
            height = cfg.height,
            "artifact written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
