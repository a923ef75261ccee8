use crate::{
    animation::{
        ease::Ease,
        pulse::{Fade, Pulse},
        timing::{frames_for_secs, hold_frames_for_secs},
    },
    assets::color::ColorRef,
    foundation::error::{TutoError, TutoResult},
    scene::model::ShapeDef,
};

/// A named phase of a tutorial: a run of animated sub-frames followed by an optional hold.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepDef {
    /// Step name for logs and debugging.
    pub name: String,
    /// Animated duration in seconds (converted with the tutorial fps).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Animated sub-frame count; mutually exclusive with `duration_secs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<u32>,
    /// Trailing hold in seconds; hold frames repeat the final progress (`t = 1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_secs: Option<f64>,
    /// Trailing hold in frames; mutually exclusive with `hold_secs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_frames: Option<u32>,
    /// Easing applied to the step's linear progress.
    #[serde(default)]
    pub ease: Ease,
    /// Overlays drawn on every frame of the step, in order.
    #[serde(default)]
    pub overlays: Vec<OverlayDef>,
}

impl StepDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_frames(mut self, n: u32) -> Self {
        self.frames = Some(n);
        self.duration_secs = None;
        self
    }

    pub fn with_secs(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self.frames = None;
        self
    }

    pub fn with_hold_frames(mut self, n: u32) -> Self {
        self.hold_frames = Some(n);
        self.hold_secs = None;
        self
    }

    pub fn with_hold_secs(mut self, secs: f64) -> Self {
        self.hold_secs = Some(secs);
        self.hold_frames = None;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_overlay(mut self, overlay: impl Into<OverlayDef>) -> Self {
        self.overlays.push(overlay.into());
        self
    }

    /// Animated sub-frames at `fps`; never less than one.
    pub fn animated_frames(&self, fps: f64) -> u32 {
        match (self.frames, self.duration_secs) {
            (Some(n), _) => n.max(1),
            (None, Some(secs)) => frames_for_secs(secs, fps),
            (None, None) => 1,
        }
    }

    /// Hold frames at `fps`; may be zero.
    pub fn hold(&self, fps: f64) -> u32 {
        match (self.hold_frames, self.hold_secs) {
            (Some(n), _) => n,
            (None, Some(secs)) => hold_frames_for_secs(secs, fps),
            (None, None) => 0,
        }
    }

    pub fn total_frames(&self, fps: f64) -> u64 {
        u64::from(self.animated_frames(fps)) + u64::from(self.hold(fps))
    }

    pub(crate) fn validate(&self) -> TutoResult<()> {
        if self.frames.is_some() && self.duration_secs.is_some() {
            return Err(TutoError::validation(format!(
                "step '{}' sets both frames and duration_secs",
                self.name
            )));
        }
        if self.hold_frames.is_some() && self.hold_secs.is_some() {
            return Err(TutoError::validation(format!(
                "step '{}' sets both hold_frames and hold_secs",
                self.name
            )));
        }
        for (what, v) in [("duration_secs", self.duration_secs), ("hold_secs", self.hold_secs)] {
            if let Some(v) = v
                && (!v.is_finite() || v < 0.0)
            {
                return Err(TutoError::validation(format!(
                    "step '{}' {what} must be finite and >= 0",
                    self.name
                )));
            }
        }
        for overlay in &self.overlays {
            overlay
                .validate()
                .map_err(|e| TutoError::validation(format!("step '{}': {e}", self.name)))?;
        }
        Ok(())
    }
}

/// Where an overlay applies.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Grid cell `[row, col]`.
    Cell([u32; 2]),
    /// Grid cell by row-major index.
    Index(u32),
    /// A whole grid row.
    Row(u32),
    /// A whole grid column.
    Column(u32),
    /// Bounding box of the cells between two corners.
    Span { from: [u32; 2], to: [u32; 2] },
    /// Bounding box of the listed cells.
    Cells(Vec<[u32; 2]>),
    /// Bounding box of the listed row-major cell indices.
    Indices(Vec<u32>),
    /// Canvas rectangle `[x0, y0, x1, y1]`.
    Rect([f64; 4]),
    /// Canvas point `[x, y]`.
    Point([f64; 2]),
    /// Canvas center.
    Center,
}

impl Target {
    pub fn cell(row: u32, col: u32) -> Self {
        Self::Cell([row, col])
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::Point([x, y])
    }

    /// `(row, col)` pairs referenced by this target, for range checks.
    pub(crate) fn cells(&self) -> Vec<CellRef> {
        match self {
            Self::Cell([r, c]) => vec![CellRef::Rc(*r, *c)],
            Self::Index(i) => vec![CellRef::Index(*i)],
            Self::Row(r) => vec![CellRef::Row(*r)],
            Self::Column(c) => vec![CellRef::Column(*c)],
            Self::Span { from, to } => {
                vec![CellRef::Rc(from[0], from[1]), CellRef::Rc(to[0], to[1])]
            }
            Self::Cells(list) => list.iter().map(|[r, c]| CellRef::Rc(*r, *c)).collect(),
            Self::Indices(list) => list.iter().copied().map(CellRef::Index).collect(),
            Self::Rect(_) | Self::Point(_) | Self::Center => Vec::new(),
        }
    }

    pub(crate) fn validate(&self) -> TutoResult<()> {
        match self {
            Self::Cells(v) if v.is_empty() => Err(TutoError::validation("cells target is empty")),
            Self::Indices(v) if v.is_empty() => {
                Err(TutoError::validation("indices target is empty"))
            }
            Self::Rect(r) if r.iter().any(|v| !v.is_finite()) || r[2] < r[0] || r[3] < r[1] => {
                Err(TutoError::validation("rect target must be finite with x0<=x1, y0<=y1"))
            }
            Self::Point(p) if p.iter().any(|v| !v.is_finite()) => {
                Err(TutoError::validation("point target must be finite"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellRef {
    Rc(u32, u32),
    Index(u32),
    Row(u32),
    Column(u32),
}

/// Outline geometry used by box-like overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkShape {
    /// Cell targets follow the grid's cell shape; anything else is a rounded rectangle.
    #[default]
    Auto,
    Rect,
    RoundedRect,
    Ellipse,
}

/// Ephemeral per-frame effect, recomputed from the frame's progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayDef {
    Highlight(HighlightDef),
    Halo(HaloDef),
    Fill(FillDef),
    Grow(GrowDef),
    Pointer(PointerDef),
    Sprite(SpriteDef),
    Label(LabelDef),
    Shape(ShapeOverlayDef),
}

impl OverlayDef {
    /// Under-content overlays are drawn before cell labels, markers and sprites.
    pub fn is_under_content(&self) -> bool {
        matches!(self, Self::Highlight(_) | Self::Halo(_) | Self::Fill(_) | Self::Grow(_))
    }

    pub(crate) fn targets(&self) -> Vec<&Target> {
        match self {
            Self::Highlight(o) => o.targets.iter().collect(),
            Self::Halo(o) => o.targets.iter().collect(),
            Self::Fill(o) => o.targets.iter().collect(),
            Self::Grow(o) => o.targets.iter().collect(),
            Self::Pointer(o) => vec![&o.from, &o.to],
            Self::Sprite(o) => vec![&o.at],
            Self::Label(o) => vec![&o.at],
            Self::Shape(_) => Vec::new(),
        }
    }

    pub(crate) fn color_refs(&self) -> Vec<&ColorRef> {
        match self {
            Self::Highlight(o) => std::iter::once(&o.color)
                .chain(o.pulse_color.as_ref())
                .collect(),
            Self::Halo(o) => vec![&o.color],
            Self::Fill(o) => std::iter::once(&o.color)
                .chain(o.outline.as_ref())
                .chain(o.pulse_color.as_ref())
                .collect(),
            Self::Grow(o) => o.fill.iter().chain(o.outline.as_ref()).collect(),
            Self::Pointer(o) => match &o.style {
                PointerStyle::Dot { color, .. } => vec![color],
                PointerStyle::Finger { glow } => vec![glow],
            },
            Self::Sprite(_) => Vec::new(),
            Self::Label(o) => std::iter::once(&o.color)
                .chain(o.tag.as_ref().map(|t| &t.color))
                .collect(),
            Self::Shape(o) => o.shape.color_refs(),
        }
    }

    fn validate(&self) -> TutoResult<()> {
        for t in self.targets() {
            t.validate()?;
        }
        let positive = |what: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(TutoError::validation(format!("{what} must be finite and >= 0")))
            }
        };
        match self {
            Self::Highlight(o) => {
                no_empty(&o.targets, "highlight")?;
                positive("highlight width", o.width)?;
                positive("highlight pulse_width", o.pulse_width)?;
            }
            Self::Halo(o) => {
                no_empty(&o.targets, "halo")?;
                positive("halo max_expand", o.max_expand)?;
                if o.layers == 0 {
                    return Err(TutoError::validation("halo layers must be > 0"));
                }
                if let Some(sigma) = o.blur {
                    positive("halo blur", sigma)?;
                }
            }
            Self::Fill(o) => {
                no_empty(&o.targets, "fill")?;
                positive("fill outline_width", o.outline_width)?;
            }
            Self::Grow(o) => {
                no_empty(&o.targets, "grow")?;
                positive("grow from", o.from)?;
                positive("grow to", o.to)?;
            }
            Self::Pointer(o) => {
                if let PointerStyle::Dot { radius, .. } = o.style {
                    positive("pointer radius", radius)?;
                }
            }
            Self::Sprite(o) => {
                if o.symbol.is_empty() || o.size == 0 {
                    return Err(TutoError::validation("sprite needs a symbol and size > 0"));
                }
                positive("sprite scale_from", o.scale_from)?;
                positive("sprite scale_to", o.scale_to)?;
            }
            Self::Label(o) => {
                if !o.size.is_finite() || o.size <= 0.0 {
                    return Err(TutoError::validation("label size must be finite and > 0"));
                }
            }
            Self::Shape(o) => o.shape.validate()?,
        }
        Ok(())
    }
}

fn no_empty(targets: &[Target], what: &str) -> TutoResult<()> {
    if targets.is_empty() {
        return Err(TutoError::validation(format!("{what} overlay has no targets")));
    }
    Ok(())
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_highlight_width() -> f64 {
    3.0
}

fn default_halo_layers() -> u32 {
    6
}

fn default_halo_alpha() -> u8 {
    160
}

fn one() -> f64 {
    1.0
}

/// Bordered shape around each target.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighlightDef {
    pub targets: Vec<Target>,
    pub color: ColorRef,
    #[serde(default = "default_highlight_width")]
    pub width: f64,
    /// Outward padding around the target box.
    #[serde(default)]
    pub pad: f64,
    /// Corner radius; defaults to the grid's cell radius (plus padding) for cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub shape: MarkShape,
    #[serde(default)]
    pub pulse: Pulse,
    /// Border color reached at full pulse strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_color: Option<ColorRef>,
    /// Extra border width at full pulse strength.
    #[serde(default)]
    pub pulse_width: f64,
    #[serde(default)]
    pub fade: Fade,
}

impl HighlightDef {
    pub fn new(targets: Vec<Target>, color: impl Into<ColorRef>) -> Self {
        Self {
            targets,
            color: color.into(),
            width: default_highlight_width(),
            pad: 0.0,
            radius: None,
            shape: MarkShape::Auto,
            pulse: Pulse::default(),
            pulse_color: None,
            pulse_width: 0.0,
            fade: Fade::SOLID,
        }
    }
}

/// Concentric glow layers around each target: layer `i` of `layers` grows by
/// `max_expand * (i + 1) / layers` with alpha `alpha * (1 - i / layers)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HaloDef {
    pub targets: Vec<Target>,
    pub color: ColorRef,
    pub max_expand: f64,
    #[serde(default = "default_halo_layers")]
    pub layers: u32,
    #[serde(default = "default_halo_alpha")]
    pub alpha: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub shape: MarkShape,
    /// Gaussian blur sigma applied to the composed layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default)]
    pub pulse: Pulse,
    #[serde(default)]
    pub fade: Fade,
}

impl HaloDef {
    pub fn new(targets: Vec<Target>, color: impl Into<ColorRef>, max_expand: f64) -> Self {
        Self {
            targets,
            color: color.into(),
            max_expand,
            layers: default_halo_layers(),
            alpha: default_halo_alpha(),
            radius: None,
            shape: MarkShape::Auto,
            blur: None,
            pulse: Pulse::default(),
            fade: Fade::SOLID,
        }
    }
}

/// Filled shape over each target with an optional border.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FillDef {
    pub targets: Vec<Target>,
    pub color: ColorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ColorRef>,
    #[serde(default = "default_stroke_width")]
    pub outline_width: f64,
    #[serde(default)]
    pub pad: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub shape: MarkShape,
    #[serde(default)]
    pub pulse: Pulse,
    /// Border color reached at full pulse strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_color: Option<ColorRef>,
    #[serde(default)]
    pub pulse_width: f64,
    #[serde(default)]
    pub fade: Fade,
}

impl FillDef {
    pub fn new(targets: Vec<Target>, color: impl Into<ColorRef>) -> Self {
        Self {
            targets,
            color: color.into(),
            outline: None,
            outline_width: default_stroke_width(),
            pad: 0.0,
            radius: None,
            shape: MarkShape::Auto,
            pulse: Pulse::default(),
            pulse_color: None,
            pulse_width: 0.0,
            fade: Fade::SOLID,
        }
    }
}

/// Circle centered on each target whose radius goes from `from` to `to` with eased progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrowDef {
    pub targets: Vec<Target>,
    pub from: f64,
    pub to: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ColorRef>,
    #[serde(default = "default_stroke_width")]
    pub width: f64,
    #[serde(default)]
    pub fade: Fade,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerStyle {
    /// Plain filled disc.
    Dot { radius: f64, color: ColorRef },
    /// Light fingertip with a colored glow.
    Finger { glow: ColorRef },
}

/// Pointer moving from the center of `from` to the center of `to` with eased progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerDef {
    pub from: Target,
    pub to: Target,
    /// Offset added to both endpoints.
    #[serde(default)]
    pub offset: [f64; 2],
    pub style: PointerStyle,
    /// Size modulation; `expand` is relative here: scale is `1 + expand * wave`.
    #[serde(default)]
    pub pulse: Pulse,
}

/// Sprite centered on a target, scaled and faded with the step's progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpriteDef {
    /// Sprite symbol (for example an emoji).
    pub symbol: String,
    pub at: Target,
    /// Requested sprite box; the image is fitted inside it and never upscaled.
    pub size: u32,
    #[serde(default = "one")]
    pub scale_from: f64,
    #[serde(default = "one")]
    pub scale_to: f64,
    #[serde(default)]
    pub fade: Fade,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPlacement {
    /// Centered on the target.
    #[default]
    Center,
    /// Centered horizontally, `gap` pixels above the target's top edge.
    Above { gap: f64 },
}

/// Rounded background box behind a label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TagStyle {
    pub color: ColorRef,
    #[serde(default = "default_tag_pad_x")]
    pub pad_x: f64,
    #[serde(default = "default_tag_pad_y")]
    pub pad_y: f64,
    #[serde(default = "default_tag_radius")]
    pub radius: f64,
}

fn default_tag_pad_x() -> f64 {
    7.0
}

fn default_tag_pad_y() -> f64 {
    4.0
}

fn default_tag_radius() -> f64 {
    10.0
}

/// Text placed relative to a target.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelDef {
    pub text: String,
    pub at: Target,
    pub size: f32,
    pub color: ColorRef,
    #[serde(default)]
    pub placement: LabelPlacement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagStyle>,
    #[serde(default)]
    pub fade: Fade,
}

/// A static shape that only exists during one step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeOverlayDef {
    #[serde(flatten)]
    pub shape: ShapeDef,
    #[serde(default)]
    pub fade: Fade,
}

impl From<HighlightDef> for OverlayDef {
    fn from(v: HighlightDef) -> Self {
        Self::Highlight(v)
    }
}

impl From<HaloDef> for OverlayDef {
    fn from(v: HaloDef) -> Self {
        Self::Halo(v)
    }
}

impl From<FillDef> for OverlayDef {
    fn from(v: FillDef) -> Self {
        Self::Fill(v)
    }
}

impl From<GrowDef> for OverlayDef {
    fn from(v: GrowDef) -> Self {
        Self::Grow(v)
    }
}

impl From<PointerDef> for OverlayDef {
    fn from(v: PointerDef) -> Self {
        Self::Pointer(v)
    }
}

impl From<SpriteDef> for OverlayDef {
    fn from(v: SpriteDef) -> Self {
        Self::Sprite(v)
    }
}

impl From<LabelDef> for OverlayDef {
    fn from(v: LabelDef) -> Self {
        Self::Label(v)
    }
}

impl From<ShapeDef> for OverlayDef {
    fn from(shape: ShapeDef) -> Self {
        Self::Shape(ShapeOverlayDef {
            shape,
            fade: Fade::SOLID,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/steps.rs"]
mod tests;
