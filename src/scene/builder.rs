use std::collections::HashMap;

use crate::{
    assets::{
        color::{ColorRef, Palette},
        font::{FontResolver, ShapedText, TextEngine},
        sprite::SpriteLoader,
    },
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::{TutoError, TutoResult},
    },
    layout::{
        fit::{FitParams, LayoutRequest, SceneLayout, TextRole, centered_grid, layout},
        geometry::GridGeometry,
        wrap::wrap_lines,
    },
    render::painter::{ImagePaint, Painter, Shape},
    scene::{
        model::{
            Anchor, ArtifactDef, Background, BannerDef, CellShape, DecorationDef, Geometry,
            GridDef, Placement, ShapeDef, SoftFill, TutorialDef,
        },
        steps::{MarkShape, OverlayDef, Target},
    },
};

/// Shared asset providers for one run: font lookup and the sprite cache.
pub struct SceneAssets {
    pub fonts: FontResolver,
    pub sprites: SpriteLoader,
}

impl SceneAssets {
    pub fn new(fonts: FontResolver, sprites: SpriteLoader) -> Self {
        Self { fonts, sprites }
    }
}

/// A grid after layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGrid {
    pub geometry: GridGeometry,
    pub shape: CellShape,
}

impl PlacedGrid {
    pub fn cell_shape(&self, row: u32, col: u32) -> Shape {
        let rect = self.geometry.cell_rect(row, col);
        match self.shape {
            CellShape::RoundedRect => Shape::rounded(rect, self.geometry.spec.radius),
            CellShape::Circle => Shape::Ellipse(rect),
        }
    }
}

type TextKey = (String, u32);

fn text_key(text: &str, size: f32) -> TextKey {
    (text.to_owned(), size.to_bits())
}

/// Immutable static content of one artifact.
///
/// Holds the pre-rendered base layer (background, decorations, grid cells, title and body), the
/// content layer drawn above under-content overlays (cell labels, markers, cell sprites), every
/// label pre-shaped and every sprite pre-loaded. Frames only read from it.
pub struct Scene {
    canvas: Canvas,
    palette: Palette,
    layout: SceneLayout,
    grid: Option<PlacedGrid>,
    base: Option<ImagePaint>,
    content: Option<ImagePaint>,
    texts: HashMap<TextKey, ShapedText>,
    sprites: HashMap<(String, u32), Option<ImagePaint>>,
    font: String,
}

impl Scene {
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn grid(&self) -> Option<&PlacedGrid> {
        self.grid.as_ref()
    }

    /// Description of the font used for every text of the scene.
    pub fn font(&self) -> &str {
        &self.font
    }

    pub(crate) fn base(&self) -> Option<&ImagePaint> {
        self.base.as_ref()
    }

    pub(crate) fn content(&self) -> Option<&ImagePaint> {
        self.content.as_ref()
    }

    pub(crate) fn color(&self, c: &ColorRef) -> TutoResult<Rgba8> {
        self.palette.resolve(c)
    }

    pub(crate) fn text(&self, text: &str, size: f32) -> TutoResult<&ShapedText> {
        self.texts
            .get(&text_key(text, size))
            .ok_or_else(|| TutoError::render(format!("text '{text}' was not shaped")))
    }

    /// Pre-loaded sprite; `None` when it could not be resolved.
    pub(crate) fn sprite(&self, symbol: &str, size: u32) -> Option<&ImagePaint> {
        self.sprites
            .get(&(symbol.to_owned(), size))
            .and_then(Option::as_ref)
    }

    fn placed_grid(&self) -> TutoResult<&PlacedGrid> {
        self.grid
            .as_ref()
            .ok_or_else(|| TutoError::render("cell target used without a grid"))
    }

    fn cell_checked(&self, row: u32, col: u32) -> TutoResult<Rect> {
        let g = &self.placed_grid()?.geometry;
        if row >= g.rows() || col >= g.cols() {
            return Err(TutoError::render(format!(
                "cell [{row}, {col}] outside the {}x{} grid",
                g.rows(),
                g.cols()
            )));
        }
        Ok(g.cell_rect(row, col))
    }

    fn index_cell(&self, index: u32) -> TutoResult<(u32, u32)> {
        let g = &self.placed_grid()?.geometry;
        Ok(g.cell_at(index as usize))
    }

    /// Bounding box of a target on the canvas. Points and the canvas center are empty rects.
    pub fn target_rect(&self, target: &Target) -> TutoResult<Rect> {
        let union = |rects: Vec<Rect>| {
            rects
                .into_iter()
                .reduce(|a, b| a.union(b))
                .ok_or_else(|| TutoError::render("empty cell list"))
        };
        match target {
            Target::Cell([r, c]) => self.cell_checked(*r, *c),
            Target::Index(i) => {
                let (r, c) = self.index_cell(*i)?;
                self.cell_checked(r, c)
            }
            Target::Row(r) => {
                let cols = self.placed_grid()?.geometry.cols();
                Ok(self
                    .cell_checked(*r, 0)?
                    .union(self.cell_checked(*r, cols.saturating_sub(1))?))
            }
            Target::Column(c) => {
                let rows = self.placed_grid()?.geometry.rows();
                Ok(self
                    .cell_checked(0, *c)?
                    .union(self.cell_checked(rows.saturating_sub(1), *c)?))
            }
            Target::Span { from, to } => Ok(self
                .cell_checked(from[0], from[1])?
                .union(self.cell_checked(to[0], to[1])?)),
            Target::Cells(list) => union(
                list.iter()
                    .map(|[r, c]| self.cell_checked(*r, *c))
                    .collect::<TutoResult<Vec<_>>>()?,
            ),
            Target::Indices(list) => union(
                list.iter()
                    .map(|i| {
                        let (r, c) = self.index_cell(*i)?;
                        self.cell_checked(r, c)
                    })
                    .collect::<TutoResult<Vec<_>>>()?,
            ),
            Target::Rect([x0, y0, x1, y1]) => Ok(Rect::new(*x0, *y0, *x1, *y1)),
            Target::Point([x, y]) => Ok(Rect::new(*x, *y, *x, *y)),
            Target::Center => {
                let c = self.canvas.center();
                Ok(Rect::new(c.x, c.y, c.x, c.y))
            }
        }
    }

    pub fn target_center(&self, target: &Target) -> TutoResult<Point> {
        Ok(self.target_rect(target)?.center())
    }

    /// Outline geometry for box-like overlays around `target`, grown by `pad`.
    pub(crate) fn mark_shape(
        &self,
        target: &Target,
        kind: MarkShape,
        radius: Option<f64>,
        pad: f64,
    ) -> TutoResult<Shape> {
        let rect = self.target_rect(target)?;
        let single_cell = matches!(target, Target::Cell(_) | Target::Index(_));
        let cell_target = !target.cells().is_empty();
        let grid = self.grid.as_ref();
        let grid_radius = grid.map_or(0.0, |g| g.geometry.spec.radius);
        let radius = radius.unwrap_or(if cell_target { grid_radius + pad } else { 0.0 });
        let padded = rect.inflate(pad, pad);

        let kind = match kind {
            MarkShape::Auto if single_cell && grid.is_some_and(|g| g.shape == CellShape::Circle) => {
                MarkShape::Ellipse
            }
            MarkShape::Auto => MarkShape::RoundedRect,
            k => k,
        };
        Ok(match kind {
            MarkShape::Rect => Shape::Rect(padded),
            MarkShape::Ellipse => Shape::Ellipse(padded),
            MarkShape::Auto | MarkShape::RoundedRect => Shape::rounded(padded, radius),
        })
    }
}

/// Build the immutable scene of `artifact`.
///
/// Resolves colors and the font fallback chain, lays out title, body and grid, shapes every label
/// used by the scene and its steps, loads every sprite (unavailable sprites are remembered as
/// absent) and renders the static layers once.
#[tracing::instrument(skip_all, fields(tutorial = %def.name, artifact = %artifact.file))]
pub fn build_scene(
    def: &TutorialDef,
    artifact: &ArtifactDef,
    assets: &mut SceneAssets,
) -> TutoResult<Scene> {
    let canvas = def.artifact_canvas(artifact);
    canvas.validate()?;
    let scene_def = &artifact.scene;
    let palette = def.palette.clone();

    let mut engine = TextEngine::new(assets.fonts.resolve(&def.fonts));
    let font_desc = engine.font().describe();
    tracing::debug!(font = %font_desc, "scene font");

    let layout = compute_layout(canvas, artifact, &mut engine);
    let grid = scene_def.grid.as_ref().map(|g| PlacedGrid {
        geometry: place_grid(canvas, g, &layout),
        shape: g.shape,
    });

    let mut texts = HashMap::new();
    for step in &artifact.steps {
        for overlay in &step.overlays {
            if let OverlayDef::Label(l) = overlay {
                let key = text_key(&l.text, l.size);
                if !texts.contains_key(&key) {
                    let shaped = engine.shape(&l.text, l.size)?;
                    texts.insert(key, shaped);
                }
            }
        }
    }

    let mut sprites = HashMap::new();
    let mut want_sprite = |symbol: &str, size: u32| {
        let key = (symbol.to_owned(), size);
        if sprites.contains_key(&key) {
            return Ok::<_, TutoError>(());
        }
        let paint = match assets.sprites.load_sprite(symbol, size) {
            Some(img) => Some(ImagePaint::from_prepared(&img)?),
            None => None,
        };
        sprites.insert(key, paint);
        Ok(())
    };
    if let Some(g) = &scene_def.grid {
        let cells = g.spec.rows as usize * g.spec.cols as usize;
        for i in 0..cells {
            if let Some(symbol) = g.sprite_for(i) {
                want_sprite(symbol, g.sprite_size)?;
            }
        }
    }
    for step in &artifact.steps {
        for overlay in &step.overlays {
            if let OverlayDef::Sprite(s) = overlay {
                want_sprite(&s.symbol, s.size)?;
            }
        }
    }

    let mut scene = Scene {
        canvas,
        palette,
        layout,
        grid,
        base: None,
        content: None,
        texts,
        sprites,
        font: font_desc,
    };

    let mut painter = Painter::new(canvas)?;
    draw_base(&mut painter, &scene, artifact, &mut engine)?;
    let base = painter.finish();
    scene.base = Some(ImagePaint::from_frame(&base)?);

    if let (Some(g), Some(placed)) = (&scene_def.grid, scene.grid) {
        if has_content(g) {
            let mut painter = Painter::new(canvas)?;
            draw_cell_content(&mut painter, &scene, g, &placed, &mut engine)?;
            scene.content = Some(ImagePaint::from_frame(&painter.finish())?);
        }
    }

    Ok(scene)
}

fn compute_layout(canvas: Canvas, artifact: &ArtifactDef, engine: &mut TextEngine) -> SceneLayout {
    let scene = &artifact.scene;
    let (params, fit_grid) = match scene.grid.as_ref().map(|g| g.placement) {
        Some(Placement::Fit(p)) => (p, scene.grid.as_ref().map(|g| g.spec)),
        _ => (FitParams::default(), None),
    };
    let title_size = scene.title.as_ref().map_or(1.0, |t| t.size);
    let body_size = scene.body.as_ref().map_or(1.0, |t| t.size);
    let req = LayoutRequest {
        canvas,
        title: scene.title.as_ref().map(|t| t.text.as_str()),
        body: scene.body.as_ref().map(|t| t.text.as_str()),
        max_text_width: scene
            .text_max_width
            .unwrap_or(f64::from(canvas.width) - 40.0),
        grid: fit_grid,
        params,
    };
    layout(&req, &mut |role, s| {
        let size = match role {
            TextRole::Title => title_size,
            TextRole::Body => body_size,
        };
        engine.shape(s, size).map(|t| t.size()).unwrap_or((0.0, 0.0))
    })
}

fn place_grid(canvas: Canvas, g: &GridDef, layout: &SceneLayout) -> GridGeometry {
    match g.placement {
        Placement::Fit(_) => layout.grid.unwrap_or_else(|| centered_grid(&g.spec, g.halo, canvas)),
        Placement::Centered => centered_grid(&g.spec, g.halo, canvas),
        Placement::Origin { x, y } => GridGeometry {
            origin: Point::new(x, y),
            spec: g.spec,
            halo: g.halo,
        },
    }
}

fn has_content(g: &GridDef) -> bool {
    !g.labels.is_empty() || !g.sprites.is_empty() || g.marker.is_some()
}

fn draw_base(
    painter: &mut Painter,
    scene: &Scene,
    artifact: &ArtifactDef,
    engine: &mut TextEngine,
) -> TutoResult<()> {
    let def = &artifact.scene;
    let canvas = scene.canvas;
    match &def.background {
        Background::Transparent => {}
        Background::Solid(c) => painter.fill_rect(canvas.rect(), scene.color(c)?),
        Background::VerticalGradient { top, bottom } => {
            let (top, bottom) = (scene.color(top)?, scene.color(bottom)?);
            let w = f64::from(canvas.width);
            let denom = f64::from(canvas.height.saturating_sub(1).max(1));
            for y in 0..canvas.height {
                let c = top.lerp(bottom, f64::from(y) / denom);
                let y = f64::from(y);
                painter.fill_rect(Rect::new(0.0, y, w, y + 1.0), c);
            }
        }
    }

    for deco in &def.decorations {
        match deco {
            DecorationDef::Shape(s) => draw_shape_def(painter, scene, s)?,
            DecorationDef::Text(t) => {
                let shaped = engine.shape(&t.text, t.size)?;
                let (w, h) = shaped.size();
                let origin = match t.anchor {
                    Anchor::TopLeft => Point::new(t.x, t.y),
                    Anchor::TopCenter => Point::new(t.x - w / 2.0, t.y),
                    Anchor::Center => Point::new(t.x - w / 2.0, t.y - h / 2.0),
                };
                painter.draw_text(&shaped, origin, scene.color(&t.color)?);
            }
            DecorationDef::Banner(b) => draw_banner(painter, scene, b, engine)?,
        }
    }

    if let (Some(g), Some(placed)) = (&def.grid, &scene.grid) {
        let fill = g.fill.as_ref().map(|c| scene.color(c)).transpose()?;
        let outline = g.outline.as_ref().map(|c| scene.color(c)).transpose()?;
        for row in 0..placed.geometry.rows() {
            for col in 0..placed.geometry.cols() {
                let shape = placed.cell_shape(row, col);
                if let Some(fill) = fill {
                    painter.fill(&shape, fill);
                }
                if let Some(soft) = &g.soft_fill {
                    draw_soft_fill(painter, scene, &shape, soft)?;
                }
                if let Some(outline) = outline {
                    painter.outline(&shape, outline, g.outline_width);
                }
            }
        }
    }

    let texts = def
        .title
        .iter()
        .zip(scene.layout.title.iter())
        .chain(def.body.iter().flat_map(|t| scene.layout.body.iter().map(move |b| (t, b))));
    for (text_def, tbox) in texts {
        let shaped = engine.shape(&tbox.text, text_def.size)?;
        painter.draw_text(
            &shaped,
            Point::new(tbox.rect.x0, tbox.rect.y0),
            scene.color(&text_def.color)?,
        );
    }
    Ok(())
}

/// Concentric rings from the full shape inwards: ring `i` of `steps` is scaled by
/// `0.65 + 0.35 * i / steps` and colored from `outer` (center) towards `inner` (edge).
fn draw_soft_fill(
    painter: &mut Painter,
    scene: &Scene,
    shape: &Shape,
    soft: &SoftFill,
) -> TutoResult<()> {
    let (inner, outer) = (scene.color(&soft.inner)?, scene.color(&soft.outer)?);
    let steps = soft.steps.max(1);
    for i in (1..=steps).rev() {
        let t = f64::from(i) / f64::from(steps);
        let alpha = (70.0 + 185.0 * t).trunc() as u8;
        let color = outer.lerp(inner, t).with_alpha(alpha);
        painter.fill(&shape.scaled(0.65 + 0.35 * t), color);
    }
    Ok(())
}

pub(crate) fn shape_geometry(geometry: &Geometry) -> Shape {
    match geometry {
        Geometry::Rect { rect, radius } => {
            Shape::rounded(Rect::new(rect[0], rect[1], rect[2], rect[3]), *radius)
        }
        Geometry::Ellipse { rect } => Shape::Ellipse(Rect::new(rect[0], rect[1], rect[2], rect[3])),
        Geometry::Circle { center, radius } => {
            Shape::circle(Point::new(center[0], center[1]), *radius)
        }
        Geometry::Polygon { points } => {
            Shape::Polygon(points.iter().map(|p| Point::new(p[0], p[1])).collect())
        }
    }
}

pub(crate) fn draw_shape_def(painter: &mut Painter, scene: &Scene, s: &ShapeDef) -> TutoResult<()> {
    let shape = shape_geometry(&s.geometry);
    if let Some(fill) = &s.fill {
        painter.fill(&shape, scene.color(fill)?);
    }
    if let Some(outline) = &s.outline {
        painter.outline(&shape, scene.color(outline)?, s.width);
    }
    Ok(())
}

fn draw_banner(
    painter: &mut Painter,
    scene: &Scene,
    b: &BannerDef,
    engine: &mut TextEngine,
) -> TutoResult<()> {
    let w = f64::from(scene.canvas.width);
    let max_box_w = (w * b.max_width_frac.clamp(0.0, 1.0)).floor();
    let max_text_w = (max_box_w - 2.0 * b.pad_x).max(1.0);
    let lines = b.text.split('\n').collect::<Vec<_>>();
    let wrapped = wrap_lines(&lines, max_text_w, &mut |s| engine.measure(s, b.size));
    let shaped = engine.shape(&wrapped.join("\n"), b.size)?;

    let (tw, th) = shaped.size();
    let box_w = (tw + 2.0 * b.pad_x).min(max_box_w);
    let box_h = th + 2.0 * b.pad_y;
    let x0 = ((w - box_w) / 2.0).floor();
    let rect = Rect::new(x0, b.y, x0 + box_w, b.y + box_h);
    painter.fill(&Shape::rounded(rect, b.radius), scene.color(&b.background)?);
    painter.draw_text(
        &shaped,
        Point::new(x0 + b.pad_x, b.y + b.pad_y),
        scene.color(&b.color)?,
    );
    Ok(())
}

fn draw_cell_content(
    painter: &mut Painter,
    scene: &Scene,
    g: &GridDef,
    placed: &PlacedGrid,
    engine: &mut TextEngine,
) -> TutoResult<()> {
    let label_color = scene.color(&g.label_color)?;
    let marker_color = g.marker.as_ref().map(|m| scene.color(&m.color)).transpose()?;
    for index in 0..placed.geometry.len() {
        let (row, col) = placed.geometry.cell_at(index);
        let center = placed.geometry.cell_center(row, col);

        if let Some(symbol) = g.sprite_for(index)
            && let Some(sprite) = scene.sprite(symbol, g.sprite_size)
        {
            let (w, h) = sprite.size();
            let (w, h) = (f64::from(w), f64::from(h));
            let x0 = (center.x - w / 2.0).floor();
            let y0 = (center.y - h / 2.0).floor();
            painter.draw_image(sprite, Rect::new(x0, y0, x0 + w, y0 + h));
        }

        if let (Some(marker), Some(color)) = (&g.marker, marker_color)
            && !marker.skip.contains(&[row, col])
        {
            painter.fill(&Shape::circle(center, marker.radius), color);
        }

        if let Some(label) = g.labels.get(index).filter(|l| !l.is_empty()) {
            let shaped = engine.shape(label, g.label_size)?;
            let (w, h) = shaped.size();
            painter.draw_text(
                &shaped,
                Point::new(center.x - w / 2.0, center.y - h / 2.0),
                label_color,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
