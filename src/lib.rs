//! tutogen renders short tutorial animations (GIF) and stills (PNG) for small memory and
//! pattern games.
//!
//! A tutorial is plain data ([`TutorialDef`]): a canvas, a frame rate, a color palette, font
//! candidates and a list of artifacts. Each artifact pairs a static scene (background, grid,
//! text, decorations) with an ordered list of steps whose overlays animate over it.
//!
//! - Load a tutorial from JSON ([`TutorialDef::from_path`]) or pick one of the [`presets`]
//! - Write every artifact with [`generate`]
//! - Or stream frames into any [`FrameSink`] with [`render_artifact`]
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod encode;
mod foundation;
mod layout;
mod pipeline;
mod render;
mod scene;

pub use crate::foundation::core::{Canvas, FrameIndex, Point, Rect, Rgba8};
pub use crate::foundation::error::{TutoError, TutoResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::pulse::{Fade, Pulse, Wave};
pub use crate::animation::timing::{FrameCtx, StepClock, frames_for_secs, hold_frames_for_secs};

pub use crate::assets::color::{ColorRef, Palette, parse_hex};
pub use crate::assets::font::{FontCandidate, FontResolver};
pub use crate::assets::sprite::{
    DEFAULT_FETCH_TIMEOUT, DEFAULT_SPRITE_BASE_URL, SpriteLoader, SpriteSource, sprite_file_name,
};

pub use crate::layout::fit::FitParams;
pub use crate::layout::geometry::{GridGeometry, GridSpec};

pub use crate::scene::builder::{PlacedGrid, Scene, SceneAssets, build_scene};
pub use crate::scene::model::{
    Anchor, ArtifactDef, Background, BannerDef, CellShape, DecorationDef, EncodingDef, Geometry,
    GridDef, LoopMode, MarkerDef, PaletteMode, Placement, SceneDef, ShapeDef, SoftFill, TextDef,
    TextItem, TutorialDef,
};
pub use crate::scene::presets;
pub use crate::scene::steps::{
    FillDef, GrowDef, HaloDef, HighlightDef, LabelDef, LabelPlacement, MarkShape, OverlayDef,
    PointerDef, PointerStyle, ShapeOverlayDef, SpriteDef, StepDef, TagStyle, Target,
};

pub use crate::render::frame::FrameRGBA;
pub use crate::render::overlay::compose_frame;

pub use crate::encode::artifact::{WriteOptions, write_artifact};
pub use crate::encode::quantize::SharedPalette;
pub use crate::encode::sink::{FileSink, FrameSink, InMemorySink, SinkConfig};

pub use crate::pipeline::config::{ENV_OFFLINE, ENV_SPRITE_BASE_URL, GeneratorConfig};
pub use crate::pipeline::executor::{
    ArtifactStats, generate, plan_frame_count, render_artifact, render_single_frame, run_step,
};
