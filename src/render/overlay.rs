use crate::{
    animation::timing::FrameCtx,
    assets::color::ColorRef,
    foundation::{
        core::{Point, Rect, Rgba8},
        error::{TutoError, TutoResult},
        math::lerp,
    },
    render::{
        blur::blur_frame,
        frame::FrameRGBA,
        painter::{ImagePaint, Painter, Shape},
    },
    scene::{
        builder::{Scene, draw_shape_def},
        steps::{
            FillDef, GrowDef, HaloDef, HighlightDef, LabelDef, LabelPlacement, OverlayDef,
            PointerDef, PointerStyle, SpriteDef,
        },
    },
};

const FINGER_GLOW_RINGS: u32 = 6;
const FINGER_GLOW_RADIUS: f64 = 22.0;
const FINGER_PALM_RADIUS: f64 = 14.0;
const FINGER_TIP_RADIUS: f64 = 6.0;
const FINGER_PALM: Rgba8 = Rgba8::rgba(245, 250, 255, 240);
const FINGER_TIP: Rgba8 = Rgba8::rgba(230, 240, 255, 255);

/// Render one frame: base layer, under-content overlays, cell content, remaining overlays.
pub fn compose_frame(
    scene: &Scene,
    overlays: &[OverlayDef],
    ctx: &FrameCtx,
) -> TutoResult<FrameRGBA> {
    let canvas = scene.canvas();
    let mut painter = Painter::new(canvas)?;
    if let Some(base) = scene.base() {
        painter.draw_image(base, canvas.rect());
    }
    for overlay in overlays.iter().filter(|o| o.is_under_content()) {
        draw_overlay(&mut painter, scene, overlay, ctx)?;
    }
    if let Some(content) = scene.content() {
        painter.draw_image(content, canvas.rect());
    }
    for overlay in overlays.iter().filter(|o| !o.is_under_content()) {
        draw_overlay(&mut painter, scene, overlay, ctx)?;
    }
    Ok(painter.finish())
}

/// Draw a single overlay for the frame described by `ctx`.
pub fn draw_overlay(
    painter: &mut Painter,
    scene: &Scene,
    overlay: &OverlayDef,
    ctx: &FrameCtx,
) -> TutoResult<()> {
    match overlay {
        OverlayDef::Highlight(o) => draw_highlight(painter, scene, o, ctx),
        OverlayDef::Halo(o) => draw_halo(painter, scene, o, ctx),
        OverlayDef::Fill(o) => draw_fill(painter, scene, o, ctx),
        OverlayDef::Grow(o) => draw_grow(painter, scene, o, ctx),
        OverlayDef::Pointer(o) => draw_pointer(painter, scene, o, ctx),
        OverlayDef::Sprite(o) => draw_sprite(painter, scene, o, ctx),
        OverlayDef::Label(o) => draw_label(painter, scene, o, ctx),
        OverlayDef::Shape(o) => {
            let mut res = Ok(());
            painter.with_opacity(o.fade.opacity(ctx), |p| {
                res = draw_shape_def(p, scene, &o.shape);
            });
            res
        }
    }
}

fn pulsed_color(
    scene: &Scene,
    base: &ColorRef,
    pulse: Option<&ColorRef>,
    p: f64,
) -> TutoResult<Rgba8> {
    let base = scene.color(base)?;
    Ok(match pulse {
        Some(c) => base.lerp(scene.color(c)?, p),
        None => base,
    })
}

fn draw_highlight(
    painter: &mut Painter,
    scene: &Scene,
    o: &HighlightDef,
    ctx: &FrameCtx,
) -> TutoResult<()> {
    let p = o.pulse.wave.sample(ctx);
    let color = pulsed_color(scene, &o.color, o.pulse_color.as_ref(), p)?;
    let width = o.width + o.pulse_width * p;
    let grow = o.pulse.expand_px(ctx);
    let shapes = o
        .targets
        .iter()
        .map(|t| scene.mark_shape(t, o.shape, o.radius, o.pad))
        .collect::<TutoResult<Vec<_>>>()?;

    painter.with_opacity(o.fade.opacity(ctx) * o.pulse.opacity(ctx), |painter| {
        for shape in shapes.iter().filter_map(|s| s.grow(grow)) {
            painter.outline(&shape, color, width);
        }
    });
    Ok(())
}

/// `layers` concentric copies of each target shape. Layer `i` grows by
/// `floor(max_expand * (i + 1) / layers)` and has alpha `floor(alpha * (1 - i / layers))`;
/// layers are composited innermost first in one group.
fn draw_halo(painter: &mut Painter, scene: &Scene, o: &HaloDef, ctx: &FrameCtx) -> TutoResult<()> {
    let color = scene.color(&o.color)?;
    let extra = o.pulse.expand_px(ctx);
    let shapes = o
        .targets
        .iter()
        .map(|t| scene.mark_shape(t, o.shape, o.radius, 0.0))
        .collect::<TutoResult<Vec<_>>>()?;
    let layers = o.layers.max(1);
    let paint_layers = |painter: &mut Painter| {
        for shape in &shapes {
            for i in 0..layers {
                let (fi, fl) = (f64::from(i), f64::from(layers));
                let expand = (o.max_expand * (fi + 1.0) / fl).floor() + extra;
                let alpha = (f64::from(o.alpha) * (1.0 - fi / fl)).floor() as u8;
                if let Some(ring) = shape.grow(expand) {
                    painter.fill(&ring, color.with_alpha(alpha));
                }
            }
        }
    };
    let opacity = o.fade.opacity(ctx) * o.pulse.opacity(ctx);

    match o.blur.filter(|s| *s > 0.0) {
        Some(sigma) => {
            let mut layer = Painter::new(scene.canvas())?;
            paint_layers(&mut layer);
            let mut frame = layer.finish();
            blur_frame(&mut frame, sigma)?;
            let image = ImagePaint::from_frame(&frame)?;
            let dest = scene.canvas().rect();
            painter.with_opacity(opacity, |p| p.draw_image(&image, dest));
        }
        None => painter.with_opacity(opacity, paint_layers),
    }
    Ok(())
}

fn draw_fill(painter: &mut Painter, scene: &Scene, o: &FillDef, ctx: &FrameCtx) -> TutoResult<()> {
    let p = o.pulse.wave.sample(ctx);
    let fill = pulsed_color(scene, &o.color, o.pulse_color.as_ref(), p)?;
    let outline = o.outline.as_ref().map(|c| scene.color(c)).transpose()?;
    let width = o.outline_width + o.pulse_width * p;
    let grow = o.pulse.expand_px(ctx);
    let shapes = o
        .targets
        .iter()
        .map(|t| scene.mark_shape(t, o.shape, o.radius, o.pad))
        .collect::<TutoResult<Vec<_>>>()?;

    painter.with_opacity(o.fade.opacity(ctx) * o.pulse.opacity(ctx), |painter| {
        for shape in shapes.iter().filter_map(|s| s.grow(grow)) {
            painter.fill(&shape, fill);
            if let Some(outline) = outline {
                painter.outline(&shape, outline, width);
            }
        }
    });
    Ok(())
}

fn draw_grow(painter: &mut Painter, scene: &Scene, o: &GrowDef, ctx: &FrameCtx) -> TutoResult<()> {
    let fill = o.fill.as_ref().map(|c| scene.color(c)).transpose()?;
    let outline = o.outline.as_ref().map(|c| scene.color(c)).transpose()?;
    let radius = lerp(o.from, o.to, ctx.t).round();
    let centers = o
        .targets
        .iter()
        .map(|t| scene.target_center(t))
        .collect::<TutoResult<Vec<_>>>()?;
    if radius <= 0.0 {
        return Ok(());
    }

    painter.with_opacity(o.fade.opacity(ctx), |painter| {
        for c in &centers {
            let circle = Shape::circle(*c, radius);
            if let Some(fill) = fill {
                painter.fill(&circle, fill);
            }
            if let Some(outline) = outline {
                painter.outline(&circle, outline, o.width);
            }
        }
    });
    Ok(())
}

fn draw_pointer(
    painter: &mut Painter,
    scene: &Scene,
    o: &PointerDef,
    ctx: &FrameCtx,
) -> TutoResult<()> {
    let from = scene.target_center(&o.from)?;
    let to = scene.target_center(&o.to)?;
    let at = Point::new(
        lerp(from.x, to.x, ctx.t) + o.offset[0],
        lerp(from.y, to.y, ctx.t) + o.offset[1],
    );
    let scale = 1.0 + o.pulse.expand * o.pulse.wave.sample(ctx);

    match &o.style {
        PointerStyle::Dot { radius, color } => {
            painter.fill(&Shape::circle(at, radius * scale), scene.color(color)?);
        }
        PointerStyle::Finger { glow } => {
            let glow = scene.color(glow)?;
            for i in 0..FINGER_GLOW_RINGS {
                let r = (FINGER_GLOW_RADIUS * (1.0 + f64::from(i) * 0.15) * scale).floor();
                let alpha = 120u32.saturating_sub(i * 18) as u8;
                painter.fill(&Shape::circle(at, r), glow.with_alpha(alpha));
            }
            let palm = (FINGER_PALM_RADIUS * scale).floor();
            painter.fill(&Shape::circle(at, palm), FINGER_PALM);
            let tip = (FINGER_TIP_RADIUS * scale).floor();
            painter.fill(&Shape::circle(at, tip), FINGER_TIP);
        }
    }
    Ok(())
}

fn draw_sprite(
    painter: &mut Painter,
    scene: &Scene,
    o: &SpriteDef,
    ctx: &FrameCtx,
) -> TutoResult<()> {
    let Some(sprite) = scene.sprite(&o.symbol, o.size) else {
        return Ok(());
    };
    let center = scene.target_center(&o.at)?;
    let k = lerp(o.scale_from, o.scale_to, ctx.t);
    let (w, h) = sprite.size();
    let (w, h) = ((f64::from(w) * k).floor(), (f64::from(h) * k).floor());
    if w < 1.0 || h < 1.0 {
        return Ok(());
    }
    let x0 = (center.x - w / 2.0).floor();
    let y0 = (center.y - h / 2.0).floor();
    painter.with_opacity(o.fade.opacity(ctx), |p| {
        p.draw_image(sprite, Rect::new(x0, y0, x0 + w, y0 + h));
    });
    Ok(())
}

fn draw_label(painter: &mut Painter, scene: &Scene, o: &LabelDef, ctx: &FrameCtx) -> TutoResult<()> {
    let text = scene.text(&o.text, o.size)?;
    let color = scene.color(&o.color)?;
    let tag = o
        .tag
        .as_ref()
        .map(|t| Ok::<_, TutoError>((t, scene.color(&t.color)?)))
        .transpose()?;
    let target = scene.target_rect(&o.at)?;
    let (tw, th) = text.size();
    let (pad_x, pad_y) = tag.map_or((0.0, 0.0), |(t, _)| (t.pad_x, t.pad_y));
    let (box_w, box_h) = (tw + 2.0 * pad_x, th + 2.0 * pad_y);

    let center = target.center();
    let x0 = (center.x - box_w / 2.0).floor();
    let y0 = match o.placement {
        LabelPlacement::Center => (center.y - box_h / 2.0).floor(),
        LabelPlacement::Above { gap } => (target.y0 - gap - box_h).floor(),
    };
    let tag_box = Rect::new(x0, y0, x0 + box_w, y0 + box_h);

    painter.with_opacity(o.fade.opacity(ctx), |p| {
        if let Some((style, fill)) = tag {
            p.fill(&Shape::rounded(tag_box, style.radius), fill);
        }
        p.draw_text(text, Point::new(x0 + pad_x, y0 + pad_y), color);
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
