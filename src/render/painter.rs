use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    assets::{
        bitmap_font,
        decode::PreparedImage,
        font::{ShapedBody, ShapedText},
    },
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::{TutoError, TutoResult},
    },
    render::frame::FrameRGBA,
};

const TOLERANCE: f64 = 0.1;

/// Geometry the painter knows how to fill and outline.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect(Rect),
    RoundedRect(Rect, f64),
    Ellipse(Rect),
    Polygon(Vec<Point>),
}

impl Shape {
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::Ellipse(Rect::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        ))
    }

    /// Rounded rectangle, or a plain rectangle when `radius <= 0`.
    pub fn rounded(rect: Rect, radius: f64) -> Self {
        if radius > 0.0 {
            Self::RoundedRect(rect, radius)
        } else {
            Self::Rect(rect)
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) | Self::RoundedRect(r, _) | Self::Ellipse(r) => *r,
            Self::Polygon(points) => {
                let mut it = points.iter();
                let Some(first) = it.next() else {
                    return Rect::ZERO;
                };
                it.fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
            }
        }
    }

    /// Move every edge outwards by `d` (inwards for negative `d`). Polygons scale about the
    /// center of their bounds. Returns `None` once the shape collapses.
    pub fn grow(&self, d: f64) -> Option<Self> {
        let grow_rect = |r: &Rect| {
            let out = Rect::new(r.x0 - d, r.y0 - d, r.x1 + d, r.y1 + d);
            (out.width() > 0.0 && out.height() > 0.0).then_some(out)
        };
        match self {
            Self::Rect(r) => grow_rect(r).map(Self::Rect),
            Self::RoundedRect(r, radius) => {
                grow_rect(r).map(|out| Self::rounded(out, (radius + d).max(0.0)))
            }
            Self::Ellipse(r) => grow_rect(r).map(Self::Ellipse),
            Self::Polygon(points) => {
                let b = self.bounds();
                let half = b.width().max(b.height()) / 2.0;
                if half <= 0.0 {
                    return None;
                }
                let k = (half + d) / half;
                (k > 0.0).then(|| Self::Polygon(scale_points(points, b.center(), k)))
            }
        }
    }

    /// Uniform scale about the center of the bounds.
    pub fn scaled(&self, k: f64) -> Self {
        let c = self.bounds().center();
        let scale_rect = |r: &Rect| {
            Rect::new(
                c.x + (r.x0 - c.x) * k,
                c.y + (r.y0 - c.y) * k,
                c.x + (r.x1 - c.x) * k,
                c.y + (r.y1 - c.y) * k,
            )
        };
        match self {
            Self::Rect(r) => Self::Rect(scale_rect(r)),
            Self::RoundedRect(r, radius) => Self::RoundedRect(scale_rect(r), radius * k),
            Self::Ellipse(r) => Self::Ellipse(scale_rect(r)),
            Self::Polygon(points) => Self::Polygon(scale_points(points, c, k)),
        }
    }

    fn to_path(&self) -> vello_cpu::kurbo::BezPath {
        let path = match self {
            Self::Rect(r) => r.to_path(TOLERANCE),
            Self::RoundedRect(r, radius) => {
                let radius = radius.min(r.width().min(r.height()) / 2.0).max(0.0);
                kurbo::RoundedRect::from_rect(*r, radius).to_path(TOLERANCE)
            }
            Self::Ellipse(r) => kurbo::Ellipse::from_rect(*r).to_path(TOLERANCE),
            Self::Polygon(points) => {
                let mut p = kurbo::BezPath::new();
                let mut it = points.iter();
                if let Some(first) = it.next() {
                    p.move_to(*first);
                    it.for_each(|pt| p.line_to(*pt));
                    p.close_path();
                }
                p
            }
        };
        bezpath_to_cpu(&path)
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn scale_points(points: &[Point], c: Point, k: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(c.x + (p.x - c.x) * k, c.y + (p.y - c.y) * k))
        .collect()
}

/// A premultiplied raster ready to be used as an image paint.
#[derive(Clone, Debug)]
pub struct ImagePaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

impl ImagePaint {
    pub fn from_premul(rgba8_premul: &[u8], width: u32, height: u32) -> TutoResult<Self> {
        let pixmap = image_premul_bytes_to_pixmap(rgba8_premul, width, height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        })
    }

    pub fn from_prepared(img: &PreparedImage) -> TutoResult<Self> {
        Self::from_premul(&img.rgba8_premul, img.width, img.height)
    }

    pub fn from_frame(frame: &FrameRGBA) -> TutoResult<Self> {
        if !frame.premultiplied {
            return Err(TutoError::render("image paints need premultiplied frames"));
        }
        Self::from_premul(&frame.data, frame.width, frame.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TutoResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TutoError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TutoError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TutoError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Immediate-mode 2D painter producing one premultiplied frame.
///
/// Draw calls are recorded into a `vello_cpu` context and rasterized by [`Painter::finish`].
/// Outlines follow the "inside stroke" convention: a border of width `w` never extends past the
/// shape it outlines.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
    canvas: Canvas,
    width: u16,
    height: u16,
}

impl Painter {
    pub fn new(canvas: Canvas) -> TutoResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| TutoError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| TutoError::render("canvas height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            canvas,
            width,
            height,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn reset(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn set_color(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    pub fn fill(&mut self, shape: &Shape, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.reset();
        self.set_color(color);
        match shape {
            Shape::Rect(r) => self.ctx.fill_rect(&rect_to_cpu(*r)),
            _ => self.ctx.fill_path(&shape.to_path()),
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill(&Shape::Rect(rect), color);
    }

    /// Border of `width` pixels drawn inside `shape`.
    pub fn outline(&mut self, shape: &Shape, color: Rgba8, width: f64) {
        if color.a == 0 || width.is_nan() || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let center_line = shape.grow(-half);
        self.reset();
        self.set_color(color);
        match center_line {
            Some(inner) => {
                self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                self.ctx.stroke_path(&inner.to_path());
            }
            // Thinner than the border: the whole shape is border.
            None => self.ctx.fill_path(&shape.to_path()),
        }
    }

    /// Draw `image` stretched over `dest`.
    pub fn draw_image(&mut self, image: &ImagePaint, dest: Rect) {
        if image.width == 0 || image.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let tr = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width() / w, dest.height() / h);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(tr);
        self.ctx.set_paint(image.paint.clone());
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        self.reset();
    }

    /// Draw shaped text with its top-left corner at `origin`.
    pub fn draw_text(&mut self, text: &ShapedText, origin: Point, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        match &text.body {
            ShapedBody::Glyphs { font, runs } => {
                self.reset();
                self.ctx
                    .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                self.set_color(color);
                for run in runs {
                    let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    self.ctx
                        .glyph_run(font)
                        .font_size(run.font_size)
                        .fill_glyphs(glyphs);
                }
                self.reset();
            }
            ShapedBody::Bitmap { lines, font_size } => {
                let px = bitmap_font::pixel_size(*font_size);
                let pitch = f64::from(bitmap_font::GLYPH_H + 2) * px;
                for (i, line) in lines.iter().enumerate() {
                    let y0 = origin.y + i as f64 * pitch;
                    for (cx, cy) in bitmap_font::lit_pixels(line) {
                        let x = origin.x + f64::from(cx) * px;
                        let y = y0 + f64::from(cy) * px;
                        self.fill_rect(Rect::new(x, y, x + px, y + px), color);
                    }
                }
            }
        }
    }

    /// Run `f` inside an opacity group. Fully transparent groups are skipped.
    pub fn with_opacity(&mut self, opacity: f64, f: impl FnOnce(&mut Self)) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        if opacity >= 1.0 {
            f(self);
            return;
        }
        self.reset();
        self.ctx.push_opacity_layer(opacity as f32);
        f(self);
        self.ctx.pop_layer();
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
