//! Built-in tutorials for the games of the platform.
//!
//! Every preset is plain [`TutorialDef`] data; `tutogen dump --preset NAME` prints it as JSON so
//! it can be tweaked and rendered with `--config`.

use crate::{
    animation::{
        ease::Ease,
        pulse::{Fade, Pulse, Wave},
    },
    assets::{
        color::{ColorRef, Palette},
        font::FontCandidate,
    },
    foundation::core::{Canvas, Rgba8},
    layout::{fit::FitParams, geometry::GridSpec},
    scene::{
        model::{
            Anchor, ArtifactDef, Background, BannerDef, CellShape, DecorationDef, EncodingDef,
            Geometry, GridDef, MarkerDef, PaletteMode, Placement, SceneDef, ShapeDef, SoftFill,
            TextDef, TutorialDef,
        },
        steps::{
            FillDef, GrowDef, HaloDef, HighlightDef, LabelDef, LabelPlacement, MarkShape, OverlayDef,
            PointerDef, PointerStyle, SpriteDef, StepDef, TagStyle, Target,
        },
    },
};

/// Names of the built-in tutorials, in listing order.
pub const PRESET_NAMES: [&str; 7] = [
    "ruta-luces",
    "deja-vu",
    "caja-recuerdos",
    "matrices",
    "matriz",
    "recuerda",
    "secuencia",
];

pub fn all() -> Vec<TutorialDef> {
    PRESET_NAMES.iter().filter_map(|n| by_name(n)).collect()
}

pub fn by_name(name: &str) -> Option<TutorialDef> {
    Some(match name {
        "ruta-luces" => ruta_luces(),
        "deja-vu" => deja_vu(),
        "caja-recuerdos" => caja_recuerdos(),
        "matrices" => matrices(),
        "matriz" => matriz(),
        "recuerda" => recuerda(),
        "secuencia" => secuencia(),
        _ => return None,
    })
}

fn named(name: &str) -> ColorRef {
    ColorRef::named(name)
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

fn sans_fonts() -> Vec<FontCandidate> {
    [
        "arial.ttf",
        "SegoeUI.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "DejaVuSans.ttf",
    ]
    .into_iter()
    .map(FontCandidate::from)
    .collect()
}

fn bold_fonts() -> Vec<FontCandidate> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "arialbd.ttf",
        "arial.ttf",
    ]
    .into_iter()
    .map(FontCandidate::from)
    .collect()
}

/// Light card palette shared by the "pink" tutorials.
fn card_palette() -> Palette {
    Palette::new()
        .with("bg", Rgba8::rgb(255, 247, 248))
        .with("card", Rgba8::rgb(255, 226, 231))
        .with("highlight", Rgba8::rgb(255, 162, 95))
        .with("border", Rgba8::rgb(255, 106, 166))
        .with("ink", Rgba8::rgb(15, 23, 42))
}

fn solid(name: &str) -> SceneDef {
    SceneDef {
        background: Background::Solid(named(name)),
        ..SceneDef::default()
    }
}

fn cells(list: &[(u32, u32)]) -> Vec<Target> {
    list.iter().map(|&(r, c)| Target::cell(r, c)).collect()
}

fn ruta_luces() -> TutorialDef {
    let lights = {
        let mut grid = GridDef::new(GridSpec::square(1, 3, 80.0, 80.0, 0.0));
        grid.shape = CellShape::Circle;
        grid.fill = Some(named("card"));
        grid.outline = Some(named("ink"));
        grid.outline_width = 3.0;
        grid.placement = Placement::Origin { x: 120.0, y: 140.0 };
        SceneDef {
            grid: Some(grid),
            ..solid("bg")
        }
    };
    let sequence = (0..=3u32).map(|lit| {
        let step = StepDef::new(format!("lit-{lit}"))
            .with_frames(1)
            .with_hold_frames(9);
        if lit == 0 {
            return step;
        }
        let lit_cells = (0..lit).map(|c| Target::cell(0, c)).collect();
        let mut fill = FillDef::new(lit_cells, named("highlight"));
        fill.outline = Some(named("border"));
        fill.outline_width = 3.0;
        step.with_overlay(fill)
    });

    let board = {
        let mut grid = GridDef::new(GridSpec {
            rows: 2,
            cols: 3,
            cell_w: 70.0,
            cell_h: 70.0,
            gap_x: 90.0,
            gap_y: 50.0,
            radius: 0.0,
        });
        grid.shape = CellShape::Circle;
        grid.fill = Some(named("card"));
        grid.outline = Some(named("ink"));
        grid.placement = Placement::Origin { x: 125.0, y: 85.0 };
        SceneDef {
            grid: Some(grid),
            ..solid("bg")
        }
    };

    let button = SceneDef {
        decorations: vec![DecorationDef::Shape(
            ShapeDef::new(Geometry::Circle {
                center: [320.0, 180.0],
                radius: 40.0,
            })
            .fill(named("highlight"))
            .outline(named("border"), 4.0),
        )],
        ..solid("bg")
    };
    let ring = |from: f64, to: f64| GrowDef {
        targets: vec![Target::point(320.0, 180.0)],
        from,
        to,
        fill: None,
        outline: Some(named("border")),
        width: 2.0,
        fade: Fade::SOLID,
    };

    TutorialDef {
        name: "ruta-luces".to_owned(),
        canvas: canvas(640, 360),
        fps: 10.0,
        palette: card_palette(),
        fonts: sans_fonts(),
        artifacts: vec![
            ArtifactDef::new("tuto1.gif", lights)
                .with_steps(sequence)
                .with_encoding(EncodingDef::frame_ms(100)),
            ArtifactDef::new("tuto2.gif", board)
                .with_step(StepDef::new("waiting").with_frames(15))
                .with_encoding(EncodingDef::frame_ms(100)),
            ArtifactDef::new("tuto3.gif", button)
                .with_step(
                    StepDef::new("pulse-out")
                        .with_frames(8)
                        .with_ease(Ease::Linear)
                        .with_overlay(ring(40.0, 54.0)),
                )
                .with_step(
                    StepDef::new("pulse-in")
                        .with_frames(8)
                        .with_ease(Ease::Linear)
                        .with_overlay(ring(54.0, 40.0)),
                )
                .with_encoding(EncodingDef::frame_ms(60)),
        ],
    }
}

fn diamond(cx: f64, cy: f64, size: f64) -> Geometry {
    let s = (size / 2.0).floor();
    Geometry::Polygon {
        points: vec![[cx, cy - s], [cx + s, cy], [cx, cy + s], [cx - s, cy]],
    }
}

fn deja_vu() -> TutorialDef {
    let (w, h) = (640.0, 360.0);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let header =
        |text: &str| DecorationDef::text(text, cx, 40.0, Anchor::TopCenter, 24.0, named("ink"));
    let card = |rect: [f64; 4]| {
        DecorationDef::Shape(
            ShapeDef::rounded(rect, 16.0)
                .fill(named("card"))
                .outline(named("border"), 2.0),
        )
    };
    let button = |rect: [f64; 4]| {
        DecorationDef::Shape(
            ShapeDef::rounded(rect, 16.0)
                .fill(named("card"))
                .outline(named("ink"), 2.0),
        )
    };
    let yes_box = [cx - 110.0, cy + 60.0, cx - 10.0, cy + 110.0];
    let no_box = [cx + 10.0, cy + 60.0, cx + 110.0, cy + 110.0];
    let yes_text = DecorationDef::text("SÍ", cx - 80.0, cy + 70.0, Anchor::TopLeft, 24.0, named("ink"));
    let no_text = DecorationDef::text("NO", cx + 40.0, cy + 70.0, Anchor::TopLeft, 24.0, named("ink"));

    let memorize = SceneDef {
        decorations: vec![
            header("PASO 1: MEMORIZA LA SECUENCIA"),
            card([cx - 60.0, cy - 60.0, cx + 60.0, cy + 60.0]),
        ],
        ..solid("bg")
    };
    let stimuli = [
        Rgba8::rgb(255, 162, 95),
        Rgba8::rgb(106, 166, 255),
        Rgba8::rgb(166, 255, 106),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, color)| {
        StepDef::new(format!("stimulus-{i}"))
            .with_frames(1)
            .with_hold_frames(9)
            .with_overlay(ShapeDef::new(diamond(cx, cy, 50.0)).fill(color))
    });

    let recognize = SceneDef {
        decorations: vec![
            header("PASO 2: ¿ESTABA EN LA SECUENCIA?"),
            card([cx - 50.0, cy - 70.0, cx + 50.0, cy + 30.0]),
            DecorationDef::Shape(
                ShapeDef::new(diamond(cx, cy - 20.0, 40.0)).fill(named("highlight")),
            ),
            button(yes_box),
            yes_text,
            button(no_box),
            no_text.clone(),
        ],
        ..solid("bg")
    };

    let feedback = SceneDef {
        decorations: vec![header("PASO 3: RECIBE TU PUNTAJE"), button(no_box), no_text],
        ..solid("bg")
    };
    let mut press = FillDef::new(vec![Target::Rect(yes_box)], named("highlight"));
    press.outline = Some(named("border"));
    press.outline_width = 3.0;
    press.radius = Some(16.0);
    press.pulse = Pulse {
        wave: Wave::PingPong,
        expand: 7.0,
        alpha_floor: 1.0,
    };
    let yes_label = LabelDef {
        text: "SÍ".to_owned(),
        at: Target::Rect(yes_box),
        size: 24.0,
        color: named("ink"),
        placement: LabelPlacement::Center,
        tag: None,
        fade: Fade::SOLID,
    };

    TutorialDef {
        name: "deja-vu".to_owned(),
        canvas: canvas(640, 360),
        fps: 10.0,
        palette: card_palette(),
        fonts: sans_fonts(),
        artifacts: vec![
            ArtifactDef::new("tuto1.gif", memorize).with_steps(stimuli),
            ArtifactDef::new("tuto2.gif", recognize)
                .with_step(StepDef::new("question").with_frames(30)),
            ArtifactDef::new("tuto3.gif", feedback).with_step(
                StepDef::new("correct-answer")
                    .with_frames(15)
                    .with_ease(Ease::Linear)
                    .with_overlay(press)
                    .with_overlay(yes_label),
            ),
        ],
    }
}

const WORDS: [&str; 6] = ["Jardín", "Libro", "Canción", "Cumpleaños", "Playa", "Mascota"];

fn caja_recuerdos() -> TutorialDef {
    let words = WORDS
        .iter()
        .copied()
        .chain(std::iter::once("Recuerda tantas como puedas..."))
        .enumerate()
        .map(|(i, word)| {
            StepDef::new(format!("word-{i}")).with_frames(1).with_overlay(LabelDef {
                text: word.to_owned(),
                at: Target::Center,
                size: 40.0,
                color: named("ink"),
                placement: LabelPlacement::Center,
                tag: None,
                fade: Fade::SOLID,
            })
        });

    // Three 213x180 tiles per row, each inset by 10 px.
    let board = || {
        let mut grid = GridDef::new(GridSpec {
            rows: 2,
            cols: 3,
            cell_w: 193.0,
            cell_h: 160.0,
            gap_x: 20.0,
            gap_y: 20.0,
            radius: 16.0,
        });
        grid.fill = Some(named("card"));
        grid.outline = Some(named("border"));
        grid.placement = Placement::Origin { x: 10.0, y: 10.0 };
        grid.labels = WORDS.iter().map(|w| (*w).to_owned()).collect();
        grid.label_size = 28.0;
        grid.label_color = named("ink");
        SceneDef {
            grid: Some(grid),
            ..solid("bg")
        }
    };

    let remembered = |n: u32, outline: &str, width: f64, pulse: Wave| {
        let targets = (0..n).map(Target::Index).collect::<Vec<_>>();
        let mut ring = HighlightDef::new(targets.clone(), named(outline));
        ring.width = width;
        if pulse != Wave::None {
            ring.pulse = Pulse {
                wave: pulse,
                expand: 0.0,
                alpha_floor: 1.0,
            };
            ring.pulse_color = Some(named("border-strong"));
            ring.pulse_width = 1.0;
        }
        (FillDef::new(targets, named("highlight")), ring)
    };
    let mut selection = (0..=WORDS.len() as u32)
        .map(|n| {
            let step = StepDef::new(format!("remembered-{n}")).with_frames(2);
            if n == 0 {
                return step;
            }
            let (fill, ring) = remembered(n, "border", 3.0, Wave::Alternate);
            step.with_overlay(fill).with_overlay(ring)
        })
        .collect::<Vec<_>>();
    let (fill, ring) = remembered(WORDS.len() as u32, "border-strong", 4.0, Wave::None);
    selection.push(
        StepDef::new("closing")
            .with_frames(3)
            .with_overlay(fill)
            .with_overlay(ring),
    );

    TutorialDef {
        name: "caja-recuerdos".to_owned(),
        canvas: canvas(640, 360),
        fps: 10.0,
        palette: card_palette().with("border-strong", Rgba8::rgb(255, 80, 150)),
        fonts: sans_fonts(),
        artifacts: vec![
            ArtifactDef::new("tuto1.gif", solid("bg"))
                .with_steps(words)
                .with_encoding(EncodingDef::frame_ms(900)),
            ArtifactDef::new("tuto2.gif", board())
                .with_step(StepDef::new("board").with_frames(30))
                .with_encoding(EncodingDef::frame_ms(100)),
            ArtifactDef::new("tuto3.gif", board())
                .with_steps(selection)
                .with_encoding(EncodingDef::frame_ms(250)),
        ],
    }
}

fn matrices() -> TutorialDef {
    let scene = |title: &str, marker: Option<MarkerDef>| {
        let mut grid = GridDef::new(GridSpec::square(3, 3, 70.0, 0.0, 12.0));
        grid.outline = Some(named("grid"));
        grid.placement = Placement::Origin { x: 75.0, y: 60.0 };
        grid.marker = marker;
        SceneDef {
            decorations: vec![DecorationDef::text(
                title,
                50.0,
                15.0,
                Anchor::TopLeft,
                18.0,
                named("text"),
            )],
            grid: Some(grid),
            ..solid("bg")
        }
    };
    let dots = |skip: Vec<[u32; 2]>| {
        Some(MarkerDef {
            radius: 12.0,
            color: named("shape"),
            skip,
        })
    };

    let lines = (0..6u32).map(|i| {
        let target = if i < 3 {
            Target::Row(i)
        } else {
            Target::Column(i - 3)
        };
        let mut ring = HighlightDef::new(vec![target], named("highlight"));
        ring.width = 4.0;
        ring.radius = Some(0.0);
        ring.shape = MarkShape::Rect;
        StepDef::new(format!("line-{i}")).with_frames(1).with_overlay(ring)
    });

    let all_cells = (0..3)
        .flat_map(|r| (0..3).map(move |c| Target::cell(r, c)))
        .collect::<Vec<_>>();
    let growth = (0..4u32).map(|i| {
        let r = f64::from(8 + i * 4);
        StepDef::new(format!("size-{i}")).with_frames(1).with_overlay(GrowDef {
            targets: all_cells.clone(),
            from: r,
            to: r,
            fill: Some(named("shape")),
            outline: None,
            width: 2.0,
            fade: Fade::SOLID,
        })
    });

    let answer = PointerDef {
        from: Target::point(160.0, 260.0),
        to: Target::point(160.0, 140.0),
        offset: [0.0, 0.0],
        style: PointerStyle::Dot {
            radius: 12.0,
            color: named("shape"),
        },
        pulse: Pulse::default(),
    };

    TutorialDef {
        name: "matrices".to_owned(),
        canvas: canvas(420, 320),
        fps: 2.0,
        palette: Palette::new()
            .with("bg", Rgba8::rgb(250, 250, 252))
            .with("grid", Rgba8::rgb(200, 200, 210))
            .with("highlight", Rgba8::rgb(255, 120, 160))
            .with("shape", Rgba8::rgb(255, 90, 60))
            .with("text", Rgba8::rgb(60, 60, 80)),
        fonts: vec!["arial.ttf".into()],
        artifacts: vec![
            ArtifactDef::new(
                "tutorial_paso_1.gif",
                scene("Paso 1: Observa filas y columnas", dots(Vec::new())),
            )
            .with_steps(lines),
            ArtifactDef::new("tutorial_paso_2.gif", scene("Paso 2: Identifica la regla", None))
                .with_steps(growth),
            ArtifactDef::new(
                "tutorial_paso_3.gif",
                scene("Paso 3: Completa la matriz", dots(vec![[2, 2]])),
            )
            .with_step(
                StepDef::new("move-option")
                    .with_frames(5)
                    .with_ease(Ease::Linear)
                    .with_overlay(answer),
            ),
        ],
    }
}

const MATRIZ_SEQUENCE: [(u32, u32); 5] = [(0, 0), (1, 1), (2, 2), (3, 3), (1, 2)];

fn matriz() -> TutorialDef {
    let board = || {
        let mut grid = GridDef::new(GridSpec::square(4, 4, 44.0, 12.0, 10.0));
        grid.fill = Some(named("base"));
        SceneDef {
            grid: Some(grid),
            ..SceneDef::default()
        }
    };
    let glow = |cell: (u32, u32), max_expand: f64, layers: u32| {
        let mut halo = HaloDef::new(cells(&[cell]), named("neon"), max_expand);
        halo.layers = layers;
        halo
    };
    let lit = |cell: (u32, u32)| FillDef::new(cells(&[cell]), named("neon"));
    let idle = |name: &str, frames: u32| StepDef::new(name).with_frames(frames);

    let mut sequence = vec![idle("start", 1)];
    for (i, &cell) in MATRIZ_SEQUENCE.iter().enumerate() {
        let mut fading = glow(cell, 12.0, 5);
        fading.fade = Fade::new(5.0 / 6.0, 0.0, false);
        sequence.push(
            StepDef::new(format!("light-{i}"))
                .with_frames(10)
                .with_overlay(glow(cell, 14.0, 6))
                .with_overlay(lit(cell)),
        );
        sequence.push(
            StepDef::new(format!("fade-{i}"))
                .with_frames(6)
                .with_ease(Ease::Linear)
                .with_overlay(fading),
        );
    }
    sequence.push(idle("end", 5));

    let remember = {
        let mut scene = board();
        scene.decorations.push(DecorationDef::text(
            "Recuerda el patrón",
            240.0,
            -4.0,
            Anchor::TopCenter,
            22.0,
            named("title"),
        ));
        scene
    };
    let mut breathing = glow((1, 2), 10.0, 5);
    breathing.alpha = 30;
    breathing.pulse = Pulse {
        wave: Wave::Sine { period_frames: 60 },
        expand: 0.0,
        alpha_floor: 0.0,
    };

    let mut touches = vec![idle("start", 1)];
    for (i, &cell) in MATRIZ_SEQUENCE.iter().enumerate() {
        let finger = PointerDef {
            from: Target::cell(cell.0, cell.1),
            to: Target::cell(cell.0, cell.1),
            offset: [0.0, 14.0],
            style: PointerStyle::Finger {
                glow: named("neon"),
            },
            pulse: Pulse {
                wave: Wave::Arc,
                expand: 0.08,
                alpha_floor: 1.0,
            },
        };
        touches.push(
            StepDef::new(format!("touch-{i}"))
                .with_frames(10)
                .with_overlay(glow(cell, 16.0, 7))
                .with_overlay(lit(cell))
                .with_overlay(finger),
        );
        touches.push(idle(&format!("between-{i}"), 2));
    }
    touches.push(idle("end", 6));

    let chunking = {
        let mut grid = GridDef::new(GridSpec::square(4, 4, 44.0, 12.0, 10.0));
        grid.fill = Some(named("base"));
        grid.placement = Placement::Fit(FitParams::default());
        SceneDef {
            title: Some(TextDef::new("Retén la forma", 22.0, Rgba8::WHITE)),
            body: Some(TextDef::new(
                "Usa chunking: agrupa visualmente el patrón en bloques simples.",
                22.0,
                Rgba8::rgba(255, 255, 255, 230),
            )),
            grid: Some(grid),
            ..SceneDef::default()
        }
    };
    let blocks = vec![
        Target::Span {
            from: [0, 0],
            to: [1, 1],
        },
        Target::Span {
            from: [2, 2],
            to: [3, 3],
        },
    ];
    let mut soft_ring = HighlightDef::new(blocks.clone(), named("neon-soft"));
    soft_ring.width = 12.0;
    soft_ring.pad = 9.0;
    soft_ring.radius = Some(28.0);
    soft_ring.shape = MarkShape::RoundedRect;
    let mut ring = HighlightDef::new(blocks, named("neon"));
    ring.width = 6.0;
    ring.pad = 5.0;
    ring.radius = Some(18.0);
    ring.shape = MarkShape::RoundedRect;

    TutorialDef {
        name: "matriz".to_owned(),
        canvas: canvas(480, 270),
        fps: 30.0,
        palette: Palette::new()
            .with("base", Rgba8::rgb(43, 60, 77))
            .with("neon", Rgba8::rgb(88, 255, 210))
            .with("neon-soft", Rgba8::rgba(88, 255, 210, 120))
            .with("title", Rgba8::rgba(255, 255, 255, 220)),
        fonts: vec!["arial.ttf".into(), "DejaVuSans.ttf".into()],
        artifacts: vec![
            ArtifactDef::new("step1.gif", board()).with_steps(sequence),
            ArtifactDef::new("step2.gif", remember)
                .with_step(StepDef::new("breathe").with_frames(60).with_overlay(breathing)),
            ArtifactDef::new("step3.gif", board()).with_steps(touches),
            ArtifactDef::new("chunking.png", chunking).with_step(
                StepDef::new("chunks")
                    .with_frames(1)
                    .with_overlay(soft_ring)
                    .with_overlay(ring),
            ),
        ],
    }
}

const FRUITS: [&str; 20] = [
    "🍎", "🍊", "🍌", "🍉", "🍇", "🍓", "🍒", "🍑", "🍍", "🥥", "🥝", "🍆", "🥑", "🥦", "🥬", "🥒",
    "🌶️", "🌽", "🥕", "🧄",
];

fn recuerda() -> TutorialDef {
    let (w, h) = (640.0, 360.0);
    let center = Target::point(w / 2.0, 250.0);
    let base_r = (w.min(h) * 0.55 * 0.5).floor();

    let reveal = FRUITS[..8].iter().enumerate().map(|(i, symbol)| {
        StepDef::new(format!("reveal-{i}"))
            .with_secs(0.35)
            .with_hold_secs(0.5)
            .with_overlay(GrowDef {
                targets: vec![center.clone()],
                from: base_r,
                to: base_r * 1.1,
                fill: Some(named("card")),
                outline: None,
                width: 2.0,
                fade: Fade::SOLID,
            })
            .with_overlay(SpriteDef {
                symbol: (*symbol).to_owned(),
                at: center.clone(),
                size: (base_r * 2.0) as u32,
                scale_from: 1.0,
                scale_to: 1.28,
                fade: Fade::new(0.15, 1.0, true),
            })
    });

    let board = |title: &str, body: &str| {
        let mut grid = GridDef::new(GridSpec {
            rows: 3,
            cols: 4,
            cell_w: 100.0,
            cell_h: 60.0,
            gap_x: 12.0,
            gap_y: 12.0,
            radius: 12.0,
        });
        grid.fill = Some(named("card"));
        grid.outline = Some(named("border-soft"));
        grid.placement = Placement::Origin { x: 102.0, y: 130.0 };
        grid.sprites = FRUITS.iter().map(|s| (*s).to_owned()).collect();
        grid.sprite_size = 56;
        SceneDef {
            decorations: vec![
                DecorationDef::Shape(
                    ShapeDef::rounded([40.0, 40.0, w - 40.0, h - 40.0], 18.0).fill(named("card")),
                ),
                DecorationDef::text(title, w / 2.0, 70.0, Anchor::Center, 28.0, named("ink")),
                DecorationDef::text(body, w / 2.0, 110.0, Anchor::Center, 20.0, named("ink-soft")),
            ],
            grid: Some(grid),
            ..solid("bg")
        }
    };
    let marker = |targets: Vec<Target>, color: &str, width: f64, pad: f64, radius: f64| {
        let mut ring = HighlightDef::new(targets, named(color));
        ring.width = width;
        ring.pad = pad;
        ring.radius = Some(radius);
        ring
    };
    let focus = |cell: (u32, u32)| marker(cells(&[cell]), "accent", 3.0, 2.0, 14.0);

    let mut search = vec![StepDef::new("intro").with_frames(4)];
    for (i, &cell) in [(0, 0), (1, 2), (2, 3)].iter().enumerate() {
        search.push(
            StepDef::new(format!("target-{i}"))
                .with_frames(4)
                .with_hold_frames(4)
                .with_overlay(focus(cell)),
        );
        search.push(StepDef::new(format!("gap-{i}")).with_frames(3));
    }

    let order = [(0, 0), (1, 1), (2, 3), (0, 2)];
    let mut repeat = Vec::new();
    for (i, &cell) in order.iter().enumerate() {
        let done = |n: usize| marker(cells(&order[..n]), "ok", 2.0, 0.0, 12.0);
        let mut click = StepDef::new(format!("click-{i}")).with_frames(12);
        if i > 0 {
            click = click.with_overlay(done(i));
        }
        repeat.push(
            click.with_overlay(focus(cell)).with_overlay(PointerDef {
                from: Target::point(70.0, 90.0),
                to: Target::cell(cell.0, cell.1),
                offset: [0.0, 0.0],
                style: PointerStyle::Dot {
                    radius: 12.0,
                    color: named("accent"),
                },
                pulse: Pulse::default(),
            }),
        );
        repeat.push(
            StepDef::new(format!("selected-{i}"))
                .with_frames(6)
                .with_overlay(done(i + 1)),
        );
    }

    let quantized = |ms| EncodingDef::frame_ms(ms).with_palette(PaletteMode::Shared);
    TutorialDef {
        name: "recuerda".to_owned(),
        canvas: canvas(640, 360),
        fps: 12.0,
        palette: Palette::new()
            .with("bg", Rgba8::rgb(252, 247, 248))
            .with("card", Rgba8::WHITE)
            .with("ink", Rgba8::rgb(15, 23, 42))
            .with("ink-soft", Rgba8::rgb(100, 116, 139))
            .with("border-soft", Rgba8::rgb(232, 236, 244))
            .with("accent", Rgba8::rgb(255, 122, 121))
            .with("ok", Rgba8::rgb(46, 204, 113)),
        fonts: bold_fonts(),
        artifacts: vec![
            ArtifactDef::new("step1.gif", SceneDef::default()).with_steps(reveal),
            ArtifactDef::new(
                "step2.gif",
                board("2. Busca", "Aparece una cuadrícula con distractores. Ignóralos."),
            )
            .with_steps(search)
            .with_encoding(quantized(170)),
            ArtifactDef::new(
                "step3.gif",
                board("3. Repite", "Haz clic en el mismo orden en que aparecieron."),
            )
            .with_steps(repeat)
            .with_encoding(quantized(160)),
        ],
    }
}

const CHUNKS: [&[u32]; 3] = [&[0, 1, 2], &[3, 4, 5], &[6, 7, 8, 9]];

fn secuencia() -> TutorialDef {
    // Circles of radius 80 on a 135 x 145 pitch: neighbors overlap.
    let mut grid = GridDef::new(GridSpec {
        rows: 2,
        cols: 5,
        cell_w: 160.0,
        cell_h: 160.0,
        gap_x: -25.0,
        gap_y: -15.0,
        radius: 0.0,
    });
    grid.shape = CellShape::Circle;
    grid.soft_fill = Some(SoftFill {
        inner: named("circle-inner"),
        outer: named("circle-outer"),
        steps: 14,
    });
    grid.placement = Placement::Origin { x: 140.0, y: 170.0 };
    grid.labels = (0..10).map(|i| i.to_string()).collect();
    grid.label_size = 60.0;
    grid.label_color = ColorRef::Literal(Rgba8::WHITE);
    let scene = SceneDef {
        background: Background::VerticalGradient {
            top: named("sky-top"),
            bottom: named("sky-bottom"),
        },
        decorations: vec![DecorationDef::Banner(BannerDef {
            text: "Técnica: agrupa en bloques (chunking). Memoriza 0–1–2 | 3–4–5 | 6–7–8–9"
                .to_owned(),
            y: 24.0,
            size: 34.0,
            color: ColorRef::Literal(Rgba8::WHITE),
            background: ColorRef::Literal(Rgba8::rgba(0, 0, 0, 180)),
            pad_x: 28.0,
            pad_y: 8.0,
            max_width_frac: 0.86,
            radius: 0.0,
        })],
        grid: Some(grid),
        ..SceneDef::default()
    };

    let block = |i: usize| -> [OverlayDef; 2] {
        let color = named(&format!("block-{i}"));
        let target = Target::Indices(CHUNKS[i].to_vec());
        let mut fill = FillDef::new(vec![target.clone()], named(&format!("block-{i}-fill")));
        fill.outline = Some(color);
        fill.outline_width = 4.0;
        fill.pad = 18.0;
        fill.radius = Some(24.0);
        fill.shape = MarkShape::RoundedRect;
        let label = LabelDef {
            text: format!("Bloque {}", char::from(b'A' + i as u8)),
            at: target,
            size: 26.0,
            color: ColorRef::Literal(Rgba8::WHITE),
            placement: LabelPlacement::Above { gap: 28.0 },
            tag: Some(TagStyle {
                color: ColorRef::Literal(Rgba8::rgba(20, 24, 35, 210)),
                pad_x: 7.0,
                pad_y: 4.0,
                radius: 10.0,
            }),
            fade: Fade::SOLID,
        };
        [fill.into(), label.into()]
    };
    let all_blocks = |step: StepDef| {
        (0..CHUNKS.len())
            .flat_map(block)
            .fold(step, |step, o| step.with_overlay(o))
    };

    let mut steps = vec![StepDef::new("pause").with_frames(6)];
    for i in 0..CHUNKS.len() {
        let step = StepDef::new(format!("block-{i}")).with_frames(10);
        steps.push(block(i).into_iter().fold(step, |s, o| s.with_overlay(o)));
        steps.push(StepDef::new(format!("pause-{i}")).with_frames(6));
    }
    steps.push(all_blocks(StepDef::new("all-blocks").with_frames(10)));

    let mut palette = Palette::new()
        .with("sky-top", Rgba8::rgb(18, 31, 86))
        .with("sky-bottom", Rgba8::rgb(242, 168, 42))
        .with("circle-inner", Rgba8::rgb(85, 80, 245))
        .with("circle-outer", Rgba8::rgb(49, 133, 215));
    for (i, c) in [
        Rgba8::rgb(0, 255, 220),
        Rgba8::rgb(255, 114, 94),
        Rgba8::rgb(255, 205, 0),
    ]
    .into_iter()
    .enumerate()
    {
        palette = palette
            .with(format!("block-{i}"), c.with_alpha(160))
            .with(format!("block-{i}-fill"), c.with_alpha(65));
    }

    TutorialDef {
        name: "secuencia".to_owned(),
        canvas: canvas(1280, 720),
        fps: 12.0,
        palette,
        fonts: bold_fonts(),
        artifacts: vec![
            ArtifactDef::new("step3_chunking.png", scene.clone())
                .with_step(all_blocks(StepDef::new("all-blocks").with_frames(1))),
            ArtifactDef::new("step3_chunking.gif", scene).with_steps(steps),
        ],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
