use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::bitmap_font,
    foundation::error::{TutoError, TutoResult},
};

/// One entry of a font fallback list.
///
/// Either a filesystem path (`/usr/share/fonts/.../DejaVuSans.ttf`) or a bare file name
/// (`arial.ttf`) that is looked up among the system font files.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FontCandidate(pub String);

impl FontCandidate {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for FontCandidate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An outline font loaded into memory.
#[derive(Clone)]
pub struct OutlineFont {
    /// Family name reported by the font tables (if any).
    pub family: String,
    /// Where the face came from.
    pub origin: String,
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl OutlineFont {
    fn new(bytes: Vec<u8>, index: u32, family: String, origin: String) -> Self {
        let bytes = Arc::new(bytes);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            index,
        );
        Self {
            family,
            origin,
            bytes,
            data,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family", &self.family)
            .field("origin", &self.origin)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Result of font resolution. Resolution never fails: the built-in bitmap font is the floor.
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    Outline(OutlineFont),
    Builtin,
}

impl ResolvedFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Outline(f) => format!("{} ({})", f.family, f.origin),
            Self::Builtin => "builtin 5x7 bitmap".to_owned(),
        }
    }
}

/// Resolves font candidate lists against the filesystem and the system font database.
pub struct FontResolver {
    db: Arc<usvg::fontdb::Database>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::system()
    }
}

impl FontResolver {
    /// Resolver backed by the fonts installed on this machine.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system font database");
        Self { db: Arc::new(db) }
    }

    /// Resolver with no system fonts; only explicit paths can resolve.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Try each candidate in order, then the system sans-serif face, then the built-in font.
    pub fn resolve(&self, candidates: &[FontCandidate]) -> ResolvedFont {
        for c in candidates {
            match self.try_candidate(c) {
                Ok(font) => {
                    tracing::debug!(candidate = %c.0, family = %font.family, "font resolved");
                    return ResolvedFont::Outline(font);
                }
                Err(err) => tracing::debug!(candidate = %c.0, %err, "font candidate rejected"),
            }
        }

        if let Some(font) = self.system_sans() {
            tracing::debug!(family = %font.family, "using system sans-serif font");
            return ResolvedFont::Outline(font);
        }

        tracing::warn!("no outline font available; falling back to builtin bitmap font");
        ResolvedFont::Builtin
    }

    fn try_candidate(&self, c: &FontCandidate) -> TutoResult<OutlineFont> {
        let path = Path::new(&c.0);
        if path.is_file() {
            return load_font_file(path);
        }
        if path.components().count() > 1 {
            return Err(TutoError::validation(format!("font file '{}' not found", c.0)));
        }

        let face = self
            .db
            .faces()
            .find(|face| face_file_name(&face.source).is_some_and(|n| n.eq_ignore_ascii_case(&c.0)))
            .ok_or_else(|| TutoError::validation(format!("no system font named '{}'", c.0)))?;
        self.load_face(face.id)
            .ok_or_else(|| TutoError::validation(format!("font '{}' could not be read", c.0)))
    }

    fn system_sans(&self) -> Option<OutlineFont> {
        let query = usvg::fontdb::Query {
            families: &[usvg::fontdb::Family::SansSerif],
            ..Default::default()
        };
        if let Some(id) = self.db.query(&query)
            && let Some(font) = self.load_face(id)
        {
            return Some(font);
        }

        let id = self
            .db
            .faces()
            .find(|face| {
                face.families
                    .iter()
                    .any(|(name, _)| name.contains("Sans") && !name.contains("Mono"))
            })
            .map(|face| face.id)?;
        self.load_face(id)
    }

    fn load_face(&self, id: usvg::fontdb::ID) -> Option<OutlineFont> {
        let face = self.db.face(id)?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| face.post_script_name.clone());
        let origin = match &face.source {
            usvg::fontdb::Source::File(p) | usvg::fontdb::Source::SharedFile(p, _) => {
                p.display().to_string()
            }
            usvg::fontdb::Source::Binary(_) => "memory".to_owned(),
        };
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(OutlineFont::new(bytes, index, family, origin))
    }
}

fn face_file_name(source: &usvg::fontdb::Source) -> Option<&str> {
    match source {
        usvg::fontdb::Source::File(p) | usvg::fontdb::Source::SharedFile(p, _) => {
            p.file_name().and_then(|s| s.to_str())
        }
        usvg::fontdb::Source::Binary(_) => None,
    }
}

fn load_font_file(path: &Path) -> TutoResult<OutlineFont> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.clone());
    let face = db
        .faces()
        .next()
        .ok_or_else(|| TutoError::validation(format!("'{}' is not a font", path.display())))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| face.post_script_name.clone());
    Ok(OutlineFont::new(
        bytes,
        face.index,
        family,
        PathBuf::from(path).display().to_string(),
    ))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PositionedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ShapedRun {
    pub(crate) font_size: f32,
    pub(crate) glyphs: Vec<PositionedGlyph>,
}

#[derive(Clone, Debug)]
pub(crate) enum ShapedBody {
    Glyphs {
        font: vello_cpu::peniko::FontData,
        runs: Vec<ShapedRun>,
    },
    Bitmap {
        lines: Vec<String>,
        font_size: f32,
    },
}

/// Text shaped once and drawn many times. Glyph positions are relative to the top-left corner
/// of the text box.
#[derive(Clone, Debug)]
pub struct ShapedText {
    pub width: f64,
    pub height: f64,
    pub(crate) body: ShapedBody,
}

impl ShapedText {
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Line pitch of the built-in font, in font pixels.
const BITMAP_LINE_PITCH: f64 = (bitmap_font::GLYPH_H + 2) as f64;

/// Stateful text shaper bound to one resolved font.
pub struct TextEngine {
    font: ResolvedFont,
    family: Option<String>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl TextEngine {
    pub fn new(font: ResolvedFont) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let family = match &font {
            ResolvedFont::Outline(f) => {
                let families = font_ctx
                    .collection
                    .register_fonts(parley::fontique::Blob::from(f.bytes().to_vec()), None);
                families
                    .first()
                    .and_then(|(id, _)| font_ctx.collection.family_name(*id))
                    .map(str::to_owned)
            }
            ResolvedFont::Builtin => None,
        };
        if matches!(font, ResolvedFont::Outline(_)) && family.is_none() {
            tracing::warn!("font bytes registered no family; using builtin bitmap font");
        }

        Self {
            font: if family.is_some() {
                font
            } else {
                ResolvedFont::Builtin
            },
            family,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    pub fn font(&self) -> &ResolvedFont {
        &self.font
    }

    /// Shape `text` at `size_px`. Explicit newlines start new lines; no automatic wrapping.
    pub fn shape(&mut self, text: &str, size_px: f32) -> TutoResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TutoError::validation("text size must be finite and > 0"));
        }

        let (ResolvedFont::Outline(font), Some(family)) = (&self.font, &self.family) else {
            return Ok(shape_bitmap(text, size_px));
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .glyphs()
                    .map(|g| PositionedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect::<Vec<_>>();
                runs.push(ShapedRun {
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        Ok(ShapedText {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            body: ShapedBody::Glyphs {
                font: font.font_data().clone(),
                runs,
            },
        })
    }

    /// Width of `text` when shaped at `size_px`; zero for invalid sizes.
    pub fn measure(&mut self, text: &str, size_px: f32) -> f64 {
        self.shape(text, size_px).map(|s| s.width).unwrap_or(0.0)
    }
}

fn shape_bitmap(text: &str, size_px: f32) -> ShapedText {
    let px = bitmap_font::pixel_size(size_px);
    let lines = text.split('\n').map(str::to_owned).collect::<Vec<_>>();
    let width = lines
        .iter()
        .map(|l| bitmap_font::measure(l, size_px).0)
        .fold(0.0, f64::max);
    let height =
        f64::from(bitmap_font::GLYPH_H) * px + (lines.len() as f64 - 1.0) * BITMAP_LINE_PITCH * px;
    ShapedText {
        width,
        height,
        body: ShapedBody::Bitmap {
            lines,
            font_size: size_px,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
