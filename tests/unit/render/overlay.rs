use super::*;
use crate::{
    animation::{pulse::Fade, timing::FrameCtx},
    assets::{
        color::Palette,
        font::FontResolver,
        sprite::{SpriteLoader, SpriteSource},
    },
    foundation::core::{Canvas, FrameIndex},
    layout::geometry::GridSpec,
    scene::{
        builder::{SceneAssets, build_scene},
        model::{ArtifactDef, GridDef, SceneDef, TutorialDef},
        steps::{LabelDef, StepDef, TagStyle, Target},
    },
};

const CELL: Rgba8 = Rgba8::rgb(40, 60, 80);
const NEON: Rgba8 = Rgba8::rgb(88, 255, 210);

fn scene_with(steps: Vec<StepDef>) -> Scene {
    let mut grid = GridDef::new(GridSpec::square(2, 2, 40.0, 20.0, 8.0));
    grid.fill = Some(CELL.into());
    let scene_def = SceneDef {
        grid: Some(grid),
        ..SceneDef::default()
    };
    let def = TutorialDef {
        name: "t".to_owned(),
        canvas: Canvas::new(200, 160).unwrap(),
        fps: 10.0,
        palette: Palette::new(),
        fonts: Vec::new(),
        artifacts: vec![ArtifactDef::new("a.gif", scene_def).with_steps(steps)],
    };
    let tmp = tempfile::tempdir().unwrap();
    let mut assets = SceneAssets::new(
        FontResolver::empty(),
        SpriteLoader::new(SpriteSource::offline(tmp.path())),
    );
    build_scene(&def, &def.artifacts[0], &mut assets).unwrap()
}

fn ctx(t: f64) -> FrameCtx {
    FrameCtx {
        index: FrameIndex(0),
        step_frame: 0,
        step_frames: 2,
        u: t,
        t,
        holding: false,
    }
}

#[test]
fn no_overlays_reproduces_the_base() {
    let scene = scene_with(Vec::new());
    let f = compose_frame(&scene, &[], &ctx(0.0)).unwrap();
    // Grid is 100x100 centered: origin (50, 30).
    assert_eq!(f.pixel(70, 50), Some(CELL.to_premul()));
    assert_eq!(f.pixel(10, 10), Some([0, 0, 0, 0]));
}

#[test]
fn fill_covers_the_target_cell_only() {
    let scene = scene_with(Vec::new());
    let fill: OverlayDef = FillDef::new(vec![Target::cell(0, 0)], NEON).into();
    let f = compose_frame(&scene, &[fill], &ctx(1.0)).unwrap();
    assert_eq!(f.pixel(70, 50), Some([88, 255, 210, 255]));
    assert_eq!(f.pixel(130, 50), Some(CELL.to_premul()));
}

#[test]
fn faded_out_overlays_draw_nothing() {
    let scene = scene_with(Vec::new());
    let mut fill = FillDef::new(vec![Target::cell(0, 0)], NEON);
    fill.fade = Fade::new(1.0, 0.0, false);
    let overlays = [OverlayDef::from(fill)];
    let plain = compose_frame(&scene, &[], &ctx(1.0)).unwrap();
    assert_eq!(compose_frame(&scene, &overlays, &ctx(1.0)).unwrap(), plain);
    assert_ne!(compose_frame(&scene, &overlays, &ctx(0.0)).unwrap(), plain);
}

#[test]
fn halo_alpha_falls_off_outwards() {
    let scene = scene_with(Vec::new());
    let halo: OverlayDef = HaloDef::new(vec![Target::cell(0, 0)], NEON, 12.0).into();
    let f = compose_frame(&scene, &[halo], &ctx(0.0)).unwrap();
    // Cell (0,0) spans x 50..90; probe left of it at increasing distance, mid-height.
    let near = f.pixel(48, 50).unwrap()[3];
    let far = f.pixel(40, 50).unwrap()[3];
    assert!(near > far, "near={near} far={far}");
    assert!(far > 0);
    assert_eq!(f.pixel(30, 50), Some([0, 0, 0, 0]));
}

#[test]
fn blurred_halo_spreads_further() {
    let scene = scene_with(Vec::new());
    let mut halo = HaloDef::new(vec![Target::cell(0, 0)], NEON, 4.0);
    let sharp = compose_frame(&scene, &[halo.clone().into()], &ctx(0.0)).unwrap();
    halo.blur = Some(3.0);
    let soft = compose_frame(&scene, &[halo.into()], &ctx(0.0)).unwrap();
    assert_eq!(sharp.pixel(42, 50).map(|p| p[3]), Some(0));
    assert!(soft.pixel(42, 50).unwrap()[3] > 0);
}

#[test]
fn grow_radius_follows_progress() {
    let scene = scene_with(Vec::new());
    let grow = OverlayDef::Grow(GrowDef {
        targets: vec![Target::Center],
        from: 0.0,
        to: 30.0,
        fill: Some(Rgba8::WHITE.into()),
        outline: None,
        width: 2.0,
        fade: Fade::SOLID,
    });
    let early = compose_frame(&scene, std::slice::from_ref(&grow), &ctx(0.0)).unwrap();
    let late = compose_frame(&scene, &[grow], &ctx(1.0)).unwrap();
    // Canvas center (100, 80) sits in the gap between the cells.
    assert_eq!(early.pixel(100, 80), Some([0, 0, 0, 0]));
    assert_eq!(late.pixel(100, 80), Some([255, 255, 255, 255]));
}

#[test]
fn tagged_label_sits_above_the_target() {
    let label = LabelDef {
        text: "A".to_owned(),
        at: Target::cell(1, 0),
        size: 8.0,
        color: Rgba8::WHITE.into(),
        placement: LabelPlacement::Above { gap: 4.0 },
        tag: Some(TagStyle {
            color: Rgba8::rgb(20, 24, 35).into(),
            pad_x: 7.0,
            pad_y: 4.0,
            radius: 0.0,
        }),
        fade: Fade::SOLID,
    };
    let scene = scene_with(vec![StepDef::new("s").with_overlay(label.clone())]);
    let f = compose_frame(&scene, &[label.into()], &ctx(1.0)).unwrap();
    // Row 1 starts at y = 30 + 60 = 90; the tag ends 4 px above it.
    assert_eq!(f.pixel(70, 84), Some([20, 24, 35, 255]));
    assert_eq!(f.pixel(70, 88), Some([0, 0, 0, 0]));
}

#[test]
fn unshaped_labels_and_missing_sprites() {
    let scene = scene_with(Vec::new());
    let label = OverlayDef::Label(LabelDef {
        text: "never shaped".to_owned(),
        at: Target::Center,
        size: 8.0,
        color: Rgba8::WHITE.into(),
        placement: LabelPlacement::Center,
        tag: None,
        fade: Fade::SOLID,
    });
    assert!(compose_frame(&scene, &[label], &ctx(1.0)).is_err());

    let sprite = OverlayDef::Sprite(SpriteDef {
        symbol: "⭐".to_owned(),
        at: Target::Center,
        size: 24,
        scale_from: 1.0,
        scale_to: 2.0,
        fade: Fade::SOLID,
    });
    let plain = compose_frame(&scene, &[], &ctx(1.0)).unwrap();
    assert_eq!(compose_frame(&scene, &[sprite], &ctx(1.0)).unwrap(), plain);
}

#[test]
fn finger_pointer_travels_between_targets() {
    let scene = scene_with(Vec::new());
    let pointer = OverlayDef::Pointer(PointerDef {
        from: Target::cell(0, 0),
        to: Target::cell(0, 1),
        offset: [0.0, 0.0],
        style: PointerStyle::Finger {
            glow: NEON.into(),
        },
        pulse: Default::default(),
    });
    let start = compose_frame(&scene, std::slice::from_ref(&pointer), &ctx(0.0)).unwrap();
    let end = compose_frame(&scene, &[pointer], &ctx(1.0)).unwrap();
    // Cell centers are (70, 50) and (130, 50); the palm is near white.
    assert!(start.pixel(70, 50).unwrap()[0] > 200);
    assert!(end.pixel(130, 50).unwrap()[0] > 200);
    assert_eq!(end.pixel(70, 50), Some(CELL.to_premul()));
}
