use std::{collections::BTreeSet, io::Read, path::Path};

use anyhow::Context;

use crate::{
    assets::{
        color::{ColorRef, Palette},
        font::FontCandidate,
    },
    foundation::{
        core::{Canvas, Rgba8},
        error::{TutoError, TutoResult},
    },
    layout::{fit::FitParams, geometry::GridSpec},
    scene::steps::{CellRef, StepDef},
};

/// A complete tutorial: shared configuration plus the artifacts it produces.
///
/// This is plain data. It can be built in code (see [`crate::presets`]) or loaded from JSON, and
/// is never mutated by the pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TutorialDef {
    /// Tutorial name; also the output sub-directory.
    pub name: String,
    /// Default canvas for every artifact.
    pub canvas: Canvas,
    /// Target display rate used to convert step durations into frame counts.
    pub fps: f64,
    /// Named colors usable anywhere a color is expected.
    #[serde(default)]
    pub palette: Palette,
    /// Font fallback list, tried in order.
    #[serde(default)]
    pub fonts: Vec<FontCandidate>,
    /// Output artifacts, rendered in order.
    pub artifacts: Vec<ArtifactDef>,
}

/// One output file: a scene, the steps animated over it and how to encode the frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactDef {
    /// Relative output path; `.gif` for animations, `.png` for single stills.
    pub file: String,
    /// Canvas override for this artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    pub scene: SceneDef,
    pub steps: Vec<StepDef>,
    #[serde(default)]
    pub encoding: EncodingDef,
}

impl ArtifactDef {
    pub fn new(file: impl Into<String>, scene: SceneDef) -> Self {
        Self {
            file: file.into(),
            canvas: None,
            scene,
            steps: Vec::new(),
            encoding: EncodingDef::default(),
        }
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn with_step(mut self, step: StepDef) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_steps(mut self, steps: impl IntoIterator<Item = StepDef>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingDef) -> Self {
        self.encoding = encoding;
        self
    }

    /// Whether the artifact is a static image.
    pub fn is_still(&self) -> bool {
        extension(&self.file).as_deref() == Some("png")
    }
}

/// Static content of an artifact, drawn once and shared by every frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDef {
    #[serde(default)]
    pub background: Background,
    /// Heading laid out at the top (auto-fit layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TextDef>,
    /// Body text, greedily wrapped under the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<TextDef>,
    /// Wrap width for `body`; defaults to the canvas width minus 40.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridDef>,
    /// Fixed shapes and texts, drawn in order above the background.
    #[serde(default)]
    pub decorations: Vec<DecorationDef>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Transparent,
    Solid(ColorRef),
    /// Row-by-row linear interpolation from `top` to `bottom`.
    VerticalGradient { top: ColorRef, bottom: ColorRef },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextDef {
    pub text: String,
    pub size: f32,
    #[serde(default = "default_ink")]
    pub color: ColorRef,
}

impl TextDef {
    pub fn new(text: impl Into<String>, size: f32, color: impl Into<ColorRef>) -> Self {
        Self {
            text: text.into(),
            size,
            color: color.into(),
        }
    }
}

fn default_ink() -> ColorRef {
    ColorRef::Literal(Rgba8::BLACK)
}

fn default_width() -> f64 {
    2.0
}

fn default_label_size() -> f32 {
    24.0
}

fn default_sprite_size() -> u32 {
    56
}

fn default_soft_steps() -> u32 {
    14
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellShape {
    #[default]
    RoundedRect,
    Circle,
}

/// How a grid is positioned on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Centered on the canvas at natural size.
    #[default]
    Centered,
    /// Top-left corner of the first cell.
    Origin { x: f64, y: f64 },
    /// Under the scene's title/body, shrunk to fit the remaining height.
    Fit(FitParams),
}

/// Concentric soft fill: rings from the outer edge inwards, interpolating `outer` to `inner`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SoftFill {
    pub inner: ColorRef,
    pub outer: ColorRef,
    #[serde(default = "default_soft_steps")]
    pub steps: u32,
}

/// Small shape drawn at the center of every cell.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkerDef {
    pub radius: f64,
    pub color: ColorRef,
    /// Cells `[row, col]` left without a marker.
    #[serde(default)]
    pub skip: Vec<[u32; 2]>,
}

/// A grid of cells with optional per-cell content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridDef {
    #[serde(flatten)]
    pub spec: GridSpec,
    #[serde(default)]
    pub shape: CellShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_fill: Option<SoftFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ColorRef>,
    #[serde(default = "default_width")]
    pub outline_width: f64,
    #[serde(default)]
    pub placement: Placement,
    /// Margin kept free around every cell (for glow overlays) when placing the grid.
    #[serde(default)]
    pub halo: f64,
    /// Per-cell labels in row-major order (cells past the end get none).
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_label_size")]
    pub label_size: f32,
    #[serde(default = "default_ink")]
    pub label_color: ColorRef,
    /// Per-cell sprite symbols in row-major order, cycled when shorter than the grid.
    #[serde(default)]
    pub sprites: Vec<String>,
    #[serde(default = "default_sprite_size")]
    pub sprite_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerDef>,
}

impl GridDef {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            shape: CellShape::RoundedRect,
            fill: None,
            soft_fill: None,
            outline: None,
            outline_width: default_width(),
            placement: Placement::Centered,
            halo: 0.0,
            labels: Vec::new(),
            label_size: default_label_size(),
            label_color: default_ink(),
            sprites: Vec::new(),
            sprite_size: default_sprite_size(),
            marker: None,
        }
    }

    /// Sprite symbol shown in row-major cell `index`.
    pub fn sprite_for(&self, index: usize) -> Option<&str> {
        if self.sprites.is_empty() {
            return None;
        }
        Some(self.sprites[index % self.sprites.len()].as_str())
    }

    pub(crate) fn contains(&self, cell: CellRef) -> bool {
        let (rows, cols) = (self.spec.rows, self.spec.cols);
        match cell {
            CellRef::Rc(r, c) => r < rows && c < cols,
            CellRef::Index(i) => u64::from(i) < u64::from(rows) * u64::from(cols),
            CellRef::Row(r) => r < rows,
            CellRef::Column(c) => c < cols,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// `[x0, y0, x1, y1]` with optional corner radius.
    Rect {
        rect: [f64; 4],
        #[serde(default)]
        radius: f64,
    },
    Ellipse { rect: [f64; 4] },
    Circle { center: [f64; 2], radius: f64 },
    Polygon { points: Vec<[f64; 2]> },
}

/// A filled and/or outlined shape. Outlines are drawn inside the geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeDef {
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ColorRef>,
    #[serde(default = "default_width")]
    pub width: f64,
}

impl ShapeDef {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            fill: None,
            outline: None,
            width: default_width(),
        }
    }

    pub fn rounded(rect: [f64; 4], radius: f64) -> Self {
        Self::new(Geometry::Rect { rect, radius })
    }

    pub fn fill(mut self, c: impl Into<ColorRef>) -> Self {
        self.fill = Some(c.into());
        self
    }

    pub fn outline(mut self, c: impl Into<ColorRef>, width: f64) -> Self {
        self.outline = Some(c.into());
        self.width = width;
        self
    }

    pub(crate) fn color_refs(&self) -> Vec<&ColorRef> {
        self.fill.iter().chain(self.outline.as_ref()).collect()
    }

    pub(crate) fn validate(&self) -> TutoResult<()> {
        let finite = |vals: &[f64]| vals.iter().all(|v| v.is_finite());
        let ok = match &self.geometry {
            Geometry::Rect { rect, radius } => {
                finite(rect) && *radius >= 0.0 && rect[2] >= rect[0] && rect[3] >= rect[1]
            }
            Geometry::Ellipse { rect } => finite(rect) && rect[2] >= rect[0] && rect[3] >= rect[1],
            Geometry::Circle { center, radius } => finite(center) && *radius >= 0.0,
            Geometry::Polygon { points } => {
                points.len() >= 3 && points.iter().all(|p| finite(p))
            }
        };
        if !ok {
            return Err(TutoError::validation(format!(
                "invalid shape geometry {:?}",
                self.geometry
            )));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(TutoError::validation("shape width must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Which point of a text box sits at the given coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    Center,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub anchor: Anchor,
    pub size: f32,
    #[serde(default = "default_ink")]
    pub color: ColorRef,
}

/// Horizontally centered text on a translucent box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BannerDef {
    pub text: String,
    /// Top edge of the box.
    pub y: f64,
    pub size: f32,
    pub color: ColorRef,
    pub background: ColorRef,
    #[serde(default = "default_banner_pad_x")]
    pub pad_x: f64,
    #[serde(default = "default_banner_pad_y")]
    pub pad_y: f64,
    /// Box width cap as a fraction of the canvas width.
    #[serde(default = "default_banner_max_width")]
    pub max_width_frac: f64,
    #[serde(default)]
    pub radius: f64,
}

fn default_banner_pad_x() -> f64 {
    28.0
}

fn default_banner_pad_y() -> f64 {
    8.0
}

fn default_banner_max_width() -> f64 {
    0.86
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationDef {
    Shape(ShapeDef),
    Text(TextItem),
    Banner(BannerDef),
}

impl DecorationDef {
    pub fn text(
        text: impl Into<String>,
        x: f64,
        y: f64,
        anchor: Anchor,
        size: f32,
        color: impl Into<ColorRef>,
    ) -> Self {
        Self::Text(TextItem {
            text: text.into(),
            x,
            y,
            anchor,
            size,
            color: color.into(),
        })
    }

    fn color_refs(&self) -> Vec<&ColorRef> {
        match self {
            Self::Shape(s) => s.color_refs(),
            Self::Text(t) => vec![&t.color],
            Self::Banner(b) => vec![&b.color, &b.background],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Loop count 0: repeat indefinitely.
    #[default]
    Forever,
    /// Play once.
    Once,
    /// Repeat `n` extra times after the first play.
    Times(u16),
}

/// Color reduction for animated output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteMode {
    /// Per-frame quantization by the GIF encoder.
    #[default]
    Encoder,
    /// One median-cut palette (<= 256 colors) shared by all frames.
    Shared,
}

/// Output serialization options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodingDef {
    /// Uniform frame duration; defaults to `round(1000 / fps)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_ms: Option<u32>,
    #[serde(default)]
    pub loop_mode: LoopMode,
    #[serde(default)]
    pub palette: PaletteMode,
    /// Merge runs of identical frames into one longer frame.
    #[serde(default)]
    pub coalesce_identical: bool,
}

impl EncodingDef {
    pub fn frame_ms(ms: u32) -> Self {
        Self {
            frame_ms: Some(ms),
            ..Self::default()
        }
    }

    pub fn with_palette(mut self, palette: PaletteMode) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_loop(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }
}

impl TutorialDef {
    /// Parse and validate a tutorial from JSON.
    pub fn from_reader(reader: impl Read) -> TutoResult<Self> {
        let def: Self =
            serde_json::from_reader(reader).map_err(|e| TutoError::serde(e.to_string()))?;
        def.validate()?;
        Ok(def)
    }

    /// Parse and validate a tutorial from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> TutoResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open tutorial config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn to_json_pretty(&self) -> TutoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TutoError::serde(e.to_string()))
    }

    pub fn artifact_canvas(&self, artifact: &ArtifactDef) -> Canvas {
        artifact.canvas.unwrap_or(self.canvas)
    }

    /// Display duration of every frame of `artifact`, in milliseconds.
    pub fn frame_ms(&self, artifact: &ArtifactDef) -> u32 {
        artifact
            .encoding
            .frame_ms
            .unwrap_or_else(|| (1000.0 / self.fps).round().max(1.0) as u32)
    }

    /// Validate invariants and cross references (palette names, grid cells, file names).
    pub fn validate(&self) -> TutoResult<()> {
        normalize_rel_path(&self.name)
            .map_err(|e| TutoError::validation(format!("tutorial name: {e}")))?;
        self.canvas.validate()?;
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(TutoError::validation("fps must be finite and > 0"));
        }
        if self.artifacts.is_empty() {
            return Err(TutoError::validation("tutorial has no artifacts"));
        }

        let mut files = BTreeSet::new();
        for artifact in &self.artifacts {
            self.validate_artifact(artifact).map_err(|e| {
                TutoError::validation(format!("artifact '{}': {e}", artifact.file))
            })?;
            let file = normalize_rel_path(&artifact.file)?;
            if !files.insert(file) {
                return Err(TutoError::validation(format!(
                    "duplicate artifact file '{}'",
                    artifact.file
                )));
            }
        }
        Ok(())
    }

    fn validate_artifact(&self, artifact: &ArtifactDef) -> TutoResult<()> {
        normalize_rel_path(&artifact.file)?;
        match extension(&artifact.file).as_deref() {
            Some("gif" | "png") => {}
            _ => {
                return Err(TutoError::validation(
                    "output file must end in .gif or .png",
                ));
            }
        }
        self.artifact_canvas(artifact).validate()?;
        if artifact.steps.is_empty() {
            return Err(TutoError::validation("artifact has no steps"));
        }
        if artifact.is_still() {
            let frames: u64 = artifact.steps.iter().map(|s| s.total_frames(self.fps)).sum();
            if frames != 1 {
                return Err(TutoError::validation(format!(
                    "png output needs exactly one frame, steps produce {frames}"
                )));
            }
        }
        if artifact.encoding.frame_ms == Some(0) {
            return Err(TutoError::validation("frame_ms must be > 0"));
        }

        let scene = &artifact.scene;
        let mut colors: Vec<&ColorRef> = Vec::new();
        match &scene.background {
            Background::Transparent => {}
            Background::Solid(c) => colors.push(c),
            Background::VerticalGradient { top, bottom } => colors.extend([top, bottom]),
        }
        for text in scene.title.iter().chain(scene.body.iter()) {
            validate_size(text.size, "title/body size")?;
            colors.push(&text.color);
        }
        if let Some(w) = scene.text_max_width
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(TutoError::validation("text_max_width must be finite and > 0"));
        }
        for deco in &scene.decorations {
            match deco {
                DecorationDef::Shape(s) => s.validate()?,
                DecorationDef::Text(t) => validate_size(t.size, "text size")?,
                DecorationDef::Banner(b) => validate_size(b.size, "banner size")?,
            }
            colors.extend(deco.color_refs());
        }
        if let Some(grid) = &scene.grid {
            validate_grid(grid)?;
            let canvas = self.artifact_canvas(artifact);
            if grid.spec.rows > canvas.height || grid.spec.cols > canvas.width {
                return Err(TutoError::validation(format!(
                    "a {}x{} grid cannot fit a {}x{} canvas even at 1px cells",
                    grid.spec.rows, grid.spec.cols, canvas.width, canvas.height
                )));
            }
            if matches!(grid.placement, Placement::Fit(_))
                && scene.title.is_none()
                && scene.body.is_none()
            {
                tracing::debug!(file = %artifact.file, "fit placement without title/body text");
            }
            colors.extend(grid.fill.iter());
            colors.extend(grid.outline.iter());
            colors.push(&grid.label_color);
            if let Some(soft) = &grid.soft_fill {
                colors.extend([&soft.inner, &soft.outer]);
            }
            if let Some(marker) = &grid.marker {
                colors.push(&marker.color);
            }
        }

        for step in &artifact.steps {
            step.validate()?;
            for overlay in &step.overlays {
                colors.extend(overlay.color_refs());
                for target in overlay.targets() {
                    let cells = target.cells();
                    if cells.is_empty() {
                        continue;
                    }
                    let Some(grid) = &scene.grid else {
                        return Err(TutoError::validation(format!(
                            "step '{}' targets grid cells but the scene has no grid",
                            step.name
                        )));
                    };
                    if let Some(bad) = cells.into_iter().find(|c| !grid.contains(*c)) {
                        return Err(TutoError::validation(format!(
                            "step '{}' targets {bad:?} outside the {}x{} grid",
                            step.name, grid.spec.rows, grid.spec.cols
                        )));
                    }
                }
            }
        }

        for c in colors {
            self.palette.resolve(c)?;
        }
        Ok(())
    }
}

fn validate_size(size: f32, what: &str) -> TutoResult<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(TutoError::validation(format!("{what} must be finite and > 0")));
    }
    Ok(())
}

fn validate_grid(grid: &GridDef) -> TutoResult<()> {
    let s = &grid.spec;
    if s.rows == 0 || s.cols == 0 {
        return Err(TutoError::validation("grid rows/cols must be > 0"));
    }
    let dims = [s.cell_w, s.cell_h, s.gap_x, s.gap_y, s.radius, grid.halo];
    if dims.iter().any(|v| !v.is_finite()) {
        return Err(TutoError::validation("grid dimensions must be finite"));
    }
    if s.cell_w <= 0.0 || s.cell_h <= 0.0 {
        return Err(TutoError::validation("grid cell size must be > 0"));
    }
    if s.cell_w + s.gap_x <= 0.0 || s.cell_h + s.gap_y <= 0.0 {
        return Err(TutoError::validation("grid pitch (cell + gap) must be > 0"));
    }
    if s.radius < 0.0 || grid.halo < 0.0 || grid.outline_width < 0.0 {
        return Err(TutoError::validation("grid radius/halo/outline_width must be >= 0"));
    }
    validate_size(grid.label_size, "grid label_size")?;
    if !grid.sprites.is_empty() && grid.sprite_size == 0 {
        return Err(TutoError::validation("grid sprite_size must be > 0"));
    }
    if let Some(soft) = &grid.soft_fill
        && soft.steps == 0
    {
        return Err(TutoError::validation("soft_fill steps must be > 0"));
    }
    if let Some(marker) = &grid.marker {
        if !marker.radius.is_finite() || marker.radius < 0.0 {
            return Err(TutoError::validation("marker radius must be finite and >= 0"));
        }
        if let Some([r, c]) = marker
            .skip
            .iter()
            .find(|[r, c]| !grid.contains(CellRef::Rc(*r, *c)))
        {
            return Err(TutoError::validation(format!(
                "marker skip cell [{r}, {c}] is outside the grid"
            )));
        }
    }
    Ok(())
}

fn extension(file: &str) -> Option<String> {
    Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Normalize a relative output path: forward slashes, no empty or `.` segments, no `..`.
pub(crate) fn normalize_rel_path(source: &str) -> TutoResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TutoError::validation("output paths must be relative"));
    }
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TutoError::validation("output paths must not contain '..'"));
        }
        if part.contains(':') {
            return Err(TutoError::validation("output paths must not contain ':'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(TutoError::validation("output path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
