use super::*;
use crate::{animation::pulse::Wave, foundation::core::Rgba8};

#[test]
fn step_json_parses_with_defaults() {
    let json = r##"{
        "name": "pulse",
        "frames": 15,
        "overlays": [
            {"fill": {
                "targets": [{"cell": [0, 1]}, {"span": {"from": [0, 0], "to": [1, 1]}}],
                "color": "hilight",
                "outline": "#ff6aa6",
                "outline_width": 3,
                "pulse": {"wave": "ping_pong", "expand": 7}
            }},
            {"pointer": {
                "from": {"point": [70, 90]},
                "to": "center",
                "style": {"dot": {"radius": 12, "color": [255, 122, 121]}}
            }}
        ]
    }"##;
    let step: StepDef = serde_json::from_str(json).unwrap();
    assert_eq!(step.ease, Ease::Cosine);
    assert_eq!(step.animated_frames(10.0), 15);
    assert_eq!(step.hold(10.0), 0);

    let OverlayDef::Fill(fill) = &step.overlays[0] else {
        panic!("expected fill overlay");
    };
    assert_eq!(fill.targets[0], Target::cell(0, 1));
    assert_eq!(fill.pulse.wave, Wave::PingPong);
    assert_eq!(fill.pulse.expand, 7.0);
    assert_eq!(fill.pulse.alpha_floor, 1.0);
    assert_eq!(fill.fade, Fade::SOLID);
    assert_eq!(fill.shape, MarkShape::Auto);

    let OverlayDef::Pointer(ptr) = &step.overlays[1] else {
        panic!("expected pointer overlay");
    };
    assert_eq!(ptr.to, Target::Center);
    assert!(ptr.pulse.is_none());

    let back: StepDef = serde_json::from_str(&serde_json::to_string(&step).unwrap()).unwrap();
    assert_eq!(back, step);
}

#[test]
fn hold_seconds_at_ten_fps_is_five_frames() {
    let step = StepDef::new("hold").with_secs(1.0).with_hold_secs(0.5);
    assert_eq!(step.animated_frames(10.0), 10);
    assert_eq!(step.hold(10.0), 5);
    assert_eq!(step.total_frames(10.0), 15);
}

#[test]
fn zero_length_steps_still_emit_one_frame() {
    assert_eq!(StepDef::new("a").with_frames(0).animated_frames(30.0), 1);
    assert_eq!(StepDef::new("b").with_secs(0.01).animated_frames(10.0), 1);
    assert_eq!(StepDef::new("c").animated_frames(10.0), 1);
}

#[test]
fn conflicting_durations_are_rejected() {
    let mut step = StepDef::new("x").with_frames(3);
    step.duration_secs = Some(1.0);
    assert!(step.validate().is_err());

    let mut step = StepDef::new("y").with_hold_frames(3);
    step.hold_secs = Some(0.2);
    assert!(step.validate().is_err());

    assert!(StepDef::new("z").with_secs(f64::NAN).validate().is_err());
    assert!(StepDef::new("ok").with_secs(0.4).with_hold_frames(2).validate().is_ok());
}

#[test]
fn overlay_validation_catches_bad_parameters() {
    let empty = StepDef::new("e").with_overlay(HighlightDef::new(vec![], Rgba8::WHITE));
    assert!(empty.validate().is_err());

    let mut halo = HaloDef::new(vec![Target::cell(0, 0)], Rgba8::WHITE, 10.0);
    halo.layers = 0;
    assert!(StepDef::new("h").with_overlay(halo).validate().is_err());

    let bad_rect = FillDef::new(vec![Target::Rect([10.0, 10.0, 5.0, 20.0])], Rgba8::WHITE);
    assert!(StepDef::new("r").with_overlay(bad_rect).validate().is_err());

    let no_cells = FillDef::new(vec![Target::Cells(vec![])], Rgba8::WHITE);
    assert!(StepDef::new("c").with_overlay(no_cells).validate().is_err());
}

#[test]
fn targets_expose_cell_references() {
    assert_eq!(Target::cell(1, 2).cells(), vec![CellRef::Rc(1, 2)]);
    assert_eq!(Target::Row(3).cells(), vec![CellRef::Row(3)]);
    assert_eq!(
        Target::Span {
            from: [0, 0],
            to: [1, 1]
        }
        .cells(),
        vec![CellRef::Rc(0, 0), CellRef::Rc(1, 1)]
    );
    assert!(Target::Center.cells().is_empty());
    assert!(Target::point(3.0, 4.0).cells().is_empty());
}

#[test]
fn color_refs_cover_optional_colors() {
    let mut hl = HighlightDef::new(vec![Target::Index(0)], ColorRef::named("hilight"));
    assert_eq!(OverlayDef::from(hl.clone()).color_refs().len(), 1);
    hl.pulse_color = Some(ColorRef::named("flash"));
    let overlay = OverlayDef::from(hl);
    assert_eq!(
        overlay.color_refs(),
        vec![&ColorRef::named("hilight"), &ColorRef::named("flash")]
    );
    assert!(overlay.is_under_content());

    let label = OverlayDef::Label(LabelDef {
        text: "Bloque A".into(),
        at: Target::Center,
        size: 26.0,
        color: Rgba8::WHITE.into(),
        placement: LabelPlacement::Above { gap: 10.0 },
        tag: Some(TagStyle {
            color: ColorRef::named("tag"),
            pad_x: 7.0,
            pad_y: 4.0,
            radius: 10.0,
        }),
        fade: Fade::SOLID,
    });
    assert_eq!(label.color_refs().len(), 2);
    assert!(!label.is_under_content());
}
