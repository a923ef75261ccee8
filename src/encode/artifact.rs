use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::{
    Delay, Frame, ImageFormat, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::quantize::{MAX_COLORS, SharedPalette},
    foundation::error::{TutoError, TutoResult},
    render::frame::FrameRGBA,
    scene::model::{EncodingDef, LoopMode, PaletteMode},
};

/// NeuQuant speed handed to the GIF encoder for frames with more than 256 colors.
const GIF_QUANT_SPEED: i32 = 10;

/// How [`write_artifact`] serializes frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Display duration of every input frame.
    pub frame_ms: u32,
    pub encoding: EncodingDef,
}

/// One frame as it goes into the GIF stream: straight RGBA8 plus its delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifFrame {
    pub rgba: Vec<u8>,
    pub delay_ms: u32,
}

pub fn ensure_parent_dir(path: &Path) -> TutoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `frames` to `path`: a static PNG for `.png`, an animated GIF for `.gif`.
///
/// GIF frames fully replace the previous one (restore-to-background disposal).
pub fn write_artifact(frames: &[FrameRGBA], path: &Path, opts: &WriteOptions) -> TutoResult<()> {
    let Some(first) = frames.first() else {
        return Err(TutoError::encode(format!(
            "no frames to write to '{}'",
            path.display()
        )));
    };
    for f in frames {
        f.check_len()?;
        if (f.width, f.height) != (first.width, first.height) {
            return Err(TutoError::encode(format!(
                "mixed frame sizes in '{}': {}x{} and {}x{}",
                path.display(),
                first.width,
                first.height,
                f.width,
                f.height
            )));
        }
    }
    if opts.frame_ms == 0 {
        return Err(TutoError::validation("frame_ms must be > 0"));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let bytes = match ext.as_deref() {
        Some("png") => {
            if frames.len() != 1 {
                return Err(TutoError::validation(format!(
                    "'{}' is a still image but {} frames were rendered",
                    path.display(),
                    frames.len()
                )));
            }
            encode_png(first)?
        }
        Some("gif") => encode_gif(
            first.width,
            first.height,
            plan_gif_frames(frames, opts),
            opts.encoding.loop_mode,
        )?,
        _ => {
            return Err(TutoError::validation(format!(
                "unsupported output format for '{}' (expected .png or .gif)",
                path.display()
            )));
        }
    };

    ensure_parent_dir(path)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Merge identical runs (when enabled) and reduce colors per the palette mode.
pub fn plan_gif_frames(frames: &[FrameRGBA], opts: &WriteOptions) -> Vec<GifFrame> {
    let mut runs: Vec<(&FrameRGBA, u32)> = Vec::with_capacity(frames.len());
    let mut last_print = None;
    for f in frames {
        let print = opts.encoding.coalesce_identical.then(|| f.fingerprint());
        match runs.last_mut() {
            Some((prev, n)) if print.is_some() && print == last_print && prev.data == f.data => {
                *n += 1;
            }
            _ => runs.push((f, 1)),
        }
        last_print = print;
    }

    let mut out: Vec<GifFrame> = runs
        .iter()
        .map(|(f, n)| GifFrame {
            rgba: f.to_straight_rgba8(),
            delay_ms: opts.frame_ms.saturating_mul(*n),
        })
        .collect();

    if opts.encoding.palette == PaletteMode::Shared {
        let palette = SharedPalette::build(out.iter().map(|f| f.rgba.as_slice()), MAX_COLORS);
        tracing::debug!(colors = palette.len(), frames = out.len(), "shared palette");
        for f in &mut out {
            palette.apply(&mut f.rgba);
        }
    }
    out
}

fn encode_png(frame: &FrameRGBA) -> TutoResult<Vec<u8>> {
    let img = RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
        .ok_or_else(|| TutoError::encode("png frame buffer has the wrong size"))?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| TutoError::encode(format!("png encode: {e}")))?;
    Ok(bytes)
}

fn repeat_for(mode: LoopMode) -> Repeat {
    match mode {
        LoopMode::Forever => Repeat::Infinite,
        LoopMode::Once => Repeat::Finite(0),
        LoopMode::Times(n) => Repeat::Finite(n),
    }
}

fn encode_gif(
    width: u32,
    height: u32,
    frames: Vec<GifFrame>,
    loop_mode: LoopMode,
) -> TutoResult<Vec<u8>> {
    let gif_err = |e: image::ImageError| TutoError::encode(format!("gif encode: {e}"));
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_QUANT_SPEED);
        encoder.set_repeat(repeat_for(loop_mode)).map_err(gif_err)?;
        for f in frames {
            let img = RgbaImage::from_raw(width, height, f.rgba)
                .ok_or_else(|| TutoError::encode("gif frame buffer has the wrong size"))?;
            let delay = Delay::from_numer_denom_ms(f.delay_ms, 1);
            encoder
                .encode_frame(Frame::from_parts(img, 0, 0, delay))
                .map_err(gif_err)?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/artifact.rs"]
mod tests;
