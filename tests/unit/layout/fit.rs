use super::*;

fn mono(_role: TextRole, s: &str) -> (f64, f64) {
    (s.chars().count() as f64 * 11.0, 22.0)
}

fn neon_grid() -> GridSpec {
    GridSpec::square(4, 4, 44.0, 12.0, 10.0)
}

#[test]
fn fit_shrinks_to_available_height_with_floors() {
    let fitted = fit_grid(&neon_grid(), 150.0, &FitParams::default());
    assert!((fitted.scale - 150.0 / 254.0).abs() < 1e-9);
    assert!((fitted.scale - 0.59).abs() < 0.01);
    assert_eq!(fitted.spec.cell_w, 26.0);
    assert_eq!(fitted.spec.cell_h, 26.0);
    assert_eq!(fitted.spec.gap_x, 8.0);
    assert_eq!(fitted.spec.radius, 6.0);
}

#[test]
fn fit_leaves_grid_unscaled_when_it_fits() {
    let fitted = fit_grid(&neon_grid(), 400.0, &FitParams::default());
    assert_eq!(fitted.scale, 1.0);
    assert_eq!(fitted.spec, neon_grid());
}

#[test]
fn non_positive_available_height_counts_as_one() {
    let fitted = fit_grid(&neon_grid(), -30.0, &FitParams::default());
    assert!((fitted.scale - 1.0 / 254.0).abs() < 1e-12);
    assert_eq!(fitted.spec.cell_h, 26.0);
    assert_eq!(fitted.spec.gap_y, 8.0);
    assert_eq!(fitted.spec.radius, 6.0);
}

#[test]
fn floors_never_grow_a_dimension() {
    let spec = GridSpec::square(2, 2, 20.0, 4.0, 0.0);
    let fitted = fit_grid(&spec, 1000.0, &FitParams::default());
    assert_eq!(fitted.spec, spec);
}

#[test]
fn chunking_layout_places_text_then_grid() {
    let canvas = Canvas::new(480, 270).unwrap();
    let req = LayoutRequest {
        canvas,
        title: Some("Retén la forma"),
        body: Some("Usa chunking: agrupa visualmente el patrón en bloques simples."),
        max_text_width: 440.0,
        grid: Some(neon_grid()),
        params: FitParams::default(),
    };
    let out = layout(&req, &mut mono);

    let title = out.title.unwrap();
    assert_eq!(title.rect.y0, 2.0);
    assert_eq!(title.rect.x0, ((480.0 - 14.0 * 11.0) / 2.0_f64).floor());
    assert_eq!(out.body.len(), 2);
    assert_eq!(out.body[0].rect.y0, 26.0);
    assert_eq!(out.text_bottom, 70.0);

    let grid = out.grid.unwrap();
    assert_eq!(grid.spec.cell_w, 29.0);
    assert_eq!(grid.spec.gap_x, 8.0);
    assert_eq!(grid.origin, Point::new(170.0, 101.0));
    assert!(out.scale < 1.0);
}

#[test]
fn layout_without_grid_reports_text_only() {
    let req = LayoutRequest {
        canvas: Canvas::new(200, 100).unwrap(),
        title: None,
        body: Some("hola"),
        max_text_width: 180.0,
        grid: None,
        params: FitParams::default(),
    };
    let out = layout(&req, &mut mono);
    assert!(out.title.is_none());
    assert_eq!(out.body.len(), 1);
    assert_eq!(out.body[0].rect.y0, 2.0);
    assert!(out.grid.is_none());
    assert_eq!(out.scale, 1.0);
}

#[test]
fn grid_with_halo_always_stays_inside_canvas() {
    let canvases = [(120, 90), (320, 180), (480, 270), (640, 360), (200, 600)];
    let bodies = ["", "corto", "un texto bastante largo que ocupa varias lineas del encabezado"];
    for (w, h) in canvases {
        let canvas = Canvas::new(w, h).unwrap();
        for rows in (1..=8).chain([20, 40]) {
            for cols in [1, 3, 4, 8] {
                for cell in [20.0, 44.0, 90.0] {
                    for body in bodies {
                        let req = LayoutRequest {
                            canvas,
                            title: Some("Titulo"),
                            body: Some(body),
                            max_text_width: f64::from(w) - 40.0,
                            grid: Some(GridSpec::square(rows, cols, cell, 12.0, 10.0)),
                            params: FitParams::default(),
                        };
                        let out = layout(&req, &mut mono);
                        let g = out.grid.unwrap();
                        for r in 0..rows {
                            for c in 0..cols {
                                let b = g.cell_rect(r, c).inflate(g.halo, g.halo);
                                assert!(
                                    b.x0 >= 0.0
                                        && b.y0 >= 0.0
                                        && b.x1 <= f64::from(w)
                                        && b.y1 <= f64::from(h),
                                    "{w}x{h} rows={rows} cols={cols} cell={cell}: {b:?}"
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn tall_grid_on_a_tiny_canvas_narrows_its_halo() {
    let canvas = Canvas::new(64, 64).unwrap();
    let req = LayoutRequest {
        canvas,
        title: None,
        body: None,
        max_text_width: 24.0,
        grid: Some(GridSpec::square(40, 1, 44.0, 12.0, 10.0)),
        params: FitParams::default(),
    };
    let g = layout(&req, &mut mono).grid.unwrap();
    let b = g.bounds_with_halo();
    assert!(b.x0 >= 0.0 && b.y0 >= 0.0, "{b:?}");
    assert!(b.x1 <= 64.0 && b.y1 <= 64.0, "{b:?}");
    assert!(g.spec.cell_h >= 1.0);
}

#[test]
fn centered_grid_matches_plain_centering() {
    let canvas = Canvas::new(480, 270).unwrap();
    let g = centered_grid(&neon_grid(), 0.0, canvas);
    assert_eq!(g.origin, Point::new(134.0, 29.0));
    assert_eq!(g.spec, neon_grid());
}
