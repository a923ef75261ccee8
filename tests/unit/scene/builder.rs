use super::*;
use crate::{
    assets::sprite::SpriteSource,
    layout::geometry::GridSpec,
    scene::{
        model::{SceneDef, TextDef},
        steps::{LabelDef, LabelPlacement, SpriteDef, StepDef},
    },
};

fn assets(dir: &std::path::Path) -> SceneAssets {
    SceneAssets::new(
        FontResolver::empty(),
        SpriteLoader::new(SpriteSource::offline(dir)),
    )
}

fn tutorial(artifact: ArtifactDef) -> TutorialDef {
    TutorialDef {
        name: "t".to_owned(),
        canvas: Canvas::new(200, 120).unwrap(),
        fps: 10.0,
        palette: Palette::new().with("cell", Rgba8::rgb(40, 60, 80)),
        fonts: Vec::new(),
        artifacts: vec![artifact],
    }
}

fn grid_scene(shape: CellShape) -> SceneDef {
    let mut grid = GridDef::new(GridSpec::square(2, 3, 30.0, 10.0, 6.0));
    grid.shape = shape;
    grid.fill = Some(ColorRef::named("cell"));
    SceneDef {
        grid: Some(grid),
        ..SceneDef::default()
    }
}

#[test]
fn centered_grid_and_targets() {
    let tmp = tempfile::tempdir().unwrap();
    let art = ArtifactDef::new("a.png", grid_scene(CellShape::RoundedRect))
        .with_step(StepDef::new("s").with_frames(1));
    let def = tutorial(art);
    let scene = build_scene(&def, &def.artifacts[0], &mut assets(tmp.path())).unwrap();

    let g = scene.grid().unwrap().geometry;
    // 3*30 + 2*10 = 110 wide, 2*30 + 10 = 70 tall.
    assert_eq!(g.origin, Point::new(45.0, 25.0));
    assert_eq!(
        scene.target_rect(&Target::cell(1, 2)).unwrap(),
        Rect::new(125.0, 65.0, 155.0, 95.0)
    );
    assert_eq!(
        scene.target_rect(&Target::Index(4)).unwrap(),
        scene.target_rect(&Target::cell(1, 1)).unwrap()
    );
    assert_eq!(
        scene.target_rect(&Target::Row(0)).unwrap(),
        Rect::new(45.0, 25.0, 155.0, 55.0)
    );
    assert_eq!(
        scene.target_center(&Target::Center).unwrap(),
        Point::new(100.0, 60.0)
    );
    assert!(scene.target_rect(&Target::cell(2, 0)).is_err());

    let frame_px = |x, y| {
        let mut p = Painter::new(scene.canvas()).unwrap();
        p.draw_image(scene.base().unwrap(), scene.canvas().rect());
        p.finish().pixel(x, y)
    };
    assert_eq!(frame_px(60, 40), Some([40, 60, 80, 255]));
    assert_eq!(frame_px(5, 5), Some([0, 0, 0, 0]));
    assert!(scene.content().is_none());
}

#[test]
fn mark_shapes_follow_the_grid() {
    let tmp = tempfile::tempdir().unwrap();
    let art = ArtifactDef::new("a.png", grid_scene(CellShape::Circle))
        .with_step(StepDef::new("s").with_frames(1));
    let def = tutorial(art);
    let scene = build_scene(&def, &def.artifacts[0], &mut assets(tmp.path())).unwrap();

    let cell = scene.target_rect(&Target::cell(0, 0)).unwrap();
    assert_eq!(
        scene
            .mark_shape(&Target::cell(0, 0), MarkShape::Auto, None, 2.0)
            .unwrap(),
        Shape::Ellipse(cell.inflate(2.0, 2.0))
    );
    assert_eq!(
        scene
            .mark_shape(&Target::Row(0), MarkShape::Auto, None, 4.0)
            .unwrap(),
        Shape::RoundedRect(
            scene.target_rect(&Target::Row(0)).unwrap().inflate(4.0, 4.0),
            10.0
        )
    );
    assert_eq!(
        scene
            .mark_shape(&Target::Rect([0.0, 0.0, 10.0, 10.0]), MarkShape::Auto, None, 0.0)
            .unwrap(),
        Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0))
    );
}

#[test]
fn fit_placement_shrinks_the_grid_inside_the_canvas() {
    let tmp = tempfile::tempdir().unwrap();
    let mut scene_def = grid_scene(CellShape::RoundedRect);
    scene_def.title = Some(TextDef::new("TITLE", 16.0, Rgba8::WHITE));
    scene_def.body = Some(TextDef::new("some body text to wrap", 12.0, Rgba8::WHITE));
    if let Some(g) = scene_def.grid.as_mut() {
        g.placement = Placement::Fit(FitParams::default());
    }
    let art = ArtifactDef::new("a.png", scene_def).with_step(StepDef::new("s").with_frames(1));
    let def = tutorial(art);
    let scene = build_scene(&def, &def.artifacts[0], &mut assets(tmp.path())).unwrap();

    let layout = scene.layout();
    assert!(layout.title.is_some());
    assert!(!layout.body.is_empty());
    assert!(layout.text_bottom > 0.0);
    let g = scene.grid().unwrap().geometry;
    assert!(g.spec.cell_w < 30.0);
    let b = g.bounds_with_halo();
    assert!(b.x0 >= 0.0 && b.y0 >= 0.0 && b.x1 <= 200.0 && b.y1 <= 120.0);
    assert_eq!(scene.font(), "builtin 5x7 bitmap");
}

#[test]
fn labels_are_shaped_and_missing_sprites_are_absent() {
    let tmp = tempfile::tempdir().unwrap();
    let label = LabelDef {
        text: "hola".to_owned(),
        at: Target::Center,
        size: 14.0,
        color: ColorRef::Literal(Rgba8::WHITE),
        placement: LabelPlacement::Center,
        tag: None,
        fade: Default::default(),
    };
    let sprite = SpriteDef {
        symbol: "🙂".to_owned(),
        at: Target::Center,
        size: 32,
        scale_from: 1.0,
        scale_to: 1.0,
        fade: Default::default(),
    };
    let art = ArtifactDef::new("a.gif", SceneDef::default()).with_step(
        StepDef::new("s")
            .with_frames(2)
            .with_overlay(label)
            .with_overlay(sprite),
    );
    let def = tutorial(art);
    let scene = build_scene(&def, &def.artifacts[0], &mut assets(tmp.path())).unwrap();

    assert!(scene.text("hola", 14.0).unwrap().width > 0.0);
    assert!(scene.text("hola", 15.0).is_err());
    assert!(scene.sprite("🙂", 32).is_none());
    assert!(scene.grid().is_none());
    assert!(scene.target_rect(&Target::cell(0, 0)).is_err());
}

#[test]
fn cell_content_goes_to_its_own_layer() {
    let tmp = tempfile::tempdir().unwrap();
    let mut scene_def = grid_scene(CellShape::RoundedRect);
    if let Some(g) = scene_def.grid.as_mut() {
        g.labels = vec!["1".to_owned(), "2".to_owned()];
        g.label_color = ColorRef::Literal(Rgba8::WHITE);
    }
    let art = ArtifactDef::new("a.png", scene_def).with_step(StepDef::new("s").with_frames(1));
    let def = tutorial(art);
    let scene = build_scene(&def, &def.artifacts[0], &mut assets(tmp.path())).unwrap();
    assert!(scene.content().is_some());
}
