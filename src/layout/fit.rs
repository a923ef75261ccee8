use crate::{
    foundation::core::{Canvas, Point, Rect},
    layout::{
        geometry::{GridGeometry, GridSpec},
        wrap::wrap_words,
    },
};

/// Vertical layout constants for a text header above an auto-fitted grid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Y of the title's top edge.
    pub top: f64,
    /// Space between the title and the first body line.
    pub body_gap: f64,
    /// Space between the text block and the grid area.
    pub margin_after_text: f64,
    /// Space kept free under the grid area.
    pub bottom_margin: f64,
    /// Extra margin around the grid reserved for halos (applied top and bottom).
    pub halo_extra: f64,
    pub min_cell: f64,
    pub min_gap: f64,
    pub min_radius: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            top: 2.0,
            body_gap: 2.0,
            margin_after_text: 10.0,
            bottom_margin: 24.0,
            halo_extra: 5.0 + 4.0 + 12.0,
            min_cell: 26.0,
            min_gap: 8.0,
            min_radius: 6.0,
        }
    }
}

/// Outcome of [`fit_grid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedGrid {
    pub scale: f64,
    pub spec: GridSpec,
}

/// Uniformly shrink `spec` so that its height plus `2 * halo_extra` fits in `avail_h`.
///
/// `scale = min(1, avail_h / needed)`; non-positive `avail_h` counts as 1. Scaled sizes are
/// rounded and then floored at the minimums (a floor never exceeds the unscaled size).
pub fn fit_grid(spec: &GridSpec, avail_h: f64, params: &FitParams) -> FittedGrid {
    let avail = if avail_h <= 0.0 { 1.0 } else { avail_h };
    let needed = spec.height() + 2.0 * params.halo_extra;
    let scale = if needed > 0.0 {
        (avail / needed).min(1.0)
    } else {
        1.0
    };

    let floored = |v: f64, floor: f64| (v * scale).round().max(floor.min(v));
    FittedGrid {
        scale,
        spec: GridSpec {
            rows: spec.rows,
            cols: spec.cols,
            cell_w: floored(spec.cell_w, params.min_cell),
            cell_h: floored(spec.cell_h, params.min_cell),
            gap_x: floored(spec.gap_x, params.min_gap),
            gap_y: floored(spec.gap_y, params.min_gap),
            radius: floored(spec.radius, params.min_radius),
        },
    }
}

/// A positioned line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    pub text: String,
    pub rect: Rect,
}

/// Inputs of [`layout`].
#[derive(Clone, Debug)]
pub struct LayoutRequest<'a> {
    pub canvas: Canvas,
    pub title: Option<&'a str>,
    pub body: Option<&'a str>,
    pub max_text_width: f64,
    pub grid: Option<GridSpec>,
    pub params: FitParams,
}

/// Which text block a measurement is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Body,
}

/// Result of [`layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    pub title: Option<TextBox>,
    pub body: Vec<TextBox>,
    /// Y just below the text block.
    pub text_bottom: f64,
    pub grid: Option<GridGeometry>,
    /// Scale applied to the grid (1 when it fit unscaled).
    pub scale: f64,
}

/// Title, wrapped body and an auto-fitted grid, top to bottom, each horizontally centered.
///
/// `measure` returns the `(width, height)` of a single line of title or body text. The grid (with its halo
/// margin) is always placed inside the canvas.
pub fn layout(
    req: &LayoutRequest<'_>,
    measure: &mut dyn FnMut(TextRole, &str) -> (f64, f64),
) -> SceneLayout {
    let w = f64::from(req.canvas.width);
    let p = &req.params;
    let centered = |text: &str, tw: f64, th: f64, y: f64| TextBox {
        text: text.to_owned(),
        rect: Rect::new(
            ((w - tw) / 2.0).floor(),
            y,
            ((w - tw) / 2.0).floor() + tw,
            y + th,
        ),
    };

    let mut y = p.top;
    let title = req.title.filter(|t| !t.trim().is_empty()).map(|t| {
        let (tw, th) = measure(TextRole::Title, t);
        let b = centered(t, tw, th, y);
        y += th;
        b
    });

    let mut body = Vec::new();
    if let Some(text) = req.body.filter(|t| !t.trim().is_empty()) {
        if title.is_some() {
            y += p.body_gap;
        }
        let lines = wrap_words(text, req.max_text_width, &mut |s| measure(TextRole::Body, s).0);
        for line in lines {
            let (lw, lh) = measure(TextRole::Body, &line);
            body.push(centered(&line, lw, lh, y));
            y += lh;
        }
    }
    let text_bottom = y;

    let Some(spec) = req.grid else {
        return SceneLayout {
            title,
            body,
            text_bottom,
            grid: None,
            scale: 1.0,
        };
    };

    let avail_h = f64::from(req.canvas.height) - (text_bottom + p.margin_after_text) - p.bottom_margin;
    let fitted = fit_grid(&spec, avail_h, p);
    let needed = fitted.spec.height() + 2.0 * p.halo_extra;
    let extra = ((avail_h - needed) / 2.0).floor().max(0.0);
    let origin = Point::new(
        ((w - fitted.spec.width()) / 2.0).floor(),
        text_bottom + p.margin_after_text + extra + p.halo_extra,
    );

    let grid = keep_inside(
        GridGeometry {
            origin,
            spec: fitted.spec,
            halo: p.halo_extra,
        },
        &spec,
        req.canvas,
    );
    let scale = if grid.spec == fitted.spec {
        fitted.scale
    } else {
        grid.spec.cell_h / spec.cell_h.max(1.0)
    };

    SceneLayout {
        title,
        body,
        text_bottom,
        grid: Some(grid),
        scale,
    }
}

/// Place `natural` centered on the canvas at its natural size.
pub fn centered_grid(natural: &GridSpec, halo: f64, canvas: Canvas) -> GridGeometry {
    let origin = Point::new(
        ((f64::from(canvas.width) - natural.width()) / 2.0).floor(),
        ((f64::from(canvas.height) - natural.height()) / 2.0).floor(),
    );
    keep_inside(
        GridGeometry {
            origin,
            spec: *natural,
            halo,
        },
        natural,
        canvas,
    )
}

/// Final safety pass: relax the floors if the grid plus halo cannot fit the canvas at all, narrow
/// the halo if the relaxed grid still leaves no room for it, then clamp the origin so every cell
/// box plus halo lies inside the canvas.
pub fn keep_inside(mut grid: GridGeometry, natural: &GridSpec, canvas: Canvas) -> GridGeometry {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    grid.halo = grid.halo.min((cw.min(ch) / 4.0).floor()).max(0.0);
    let room_w = cw - 2.0 * grid.halo;
    let room_h = ch - 2.0 * grid.halo;

    if grid.spec.width() > room_w || grid.spec.height() > room_h {
        let (nw, nh) = (natural.width(), natural.height());
        let s = (room_w / nw.max(1.0)).min(room_h / nh.max(1.0)).min(1.0);
        let shrink = |v: f64| (v * s).floor().max(0.0);
        grid.spec = GridSpec {
            cell_w: shrink(natural.cell_w).max(1.0),
            cell_h: shrink(natural.cell_h).max(1.0),
            gap_x: shrink(natural.gap_x),
            gap_y: shrink(natural.gap_y),
            radius: shrink(natural.radius),
            ..*natural
        };
        tracing::debug!(scale = s, "grid relaxed below its size floors to fit the canvas");
    }

    let spare = (cw - grid.spec.width()).min(ch - grid.spec.height());
    if 2.0 * grid.halo > spare {
        grid.halo = (spare / 2.0).floor().max(0.0);
        tracing::debug!(halo = grid.halo, "halo narrowed to fit the canvas");
    }

    let clamp = |v: f64, lo: f64, hi: f64| if hi < lo { lo } else { v.clamp(lo, hi) };
    grid.origin = Point::new(
        clamp(grid.origin.x, grid.halo, cw - grid.halo - grid.spec.width()),
        clamp(grid.origin.y, grid.halo, ch - grid.halo - grid.spec.height()),
    );
    grid
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
