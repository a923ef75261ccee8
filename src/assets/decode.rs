use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{TutoError, TutoResult},
    math::premultiply_rgba8_in_place,
};

/// Raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes, shrink to fit inside `max_edge` (aspect preserved, never
/// upscaled) and convert to premultiplied RGBA8.
pub fn decode_image_fit(bytes: &[u8], max_edge: u32) -> TutoResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    Ok(prepare_rgba(thumbnail(rgba, max_edge)))
}

/// Rasterize SVG bytes so the longer edge equals `max_edge`.
pub fn rasterize_svg_fit(bytes: &[u8], max_edge: u32) -> TutoResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(TutoError::render("svg has invalid width/height"));
    }
    let scale = max_edge.max(1) as f32 / sw.max(sh);
    let w = ((sw * scale).round() as u32).max(1);
    let h = ((sh * scale).round() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| TutoError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied.
    Ok(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn thumbnail(rgba: image::RgbaImage, max_edge: u32) -> image::RgbaImage {
    let (w, h) = rgba.dimensions();
    let max_edge = max_edge.max(1);
    if w <= max_edge && h <= max_edge {
        return rgba;
    }
    let scale = f64::from(max_edge) / f64::from(w.max(h));
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    image::imageops::resize(&rgba, nw, nh, image::imageops::FilterType::Lanczos3)
}

fn prepare_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
