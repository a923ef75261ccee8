use super::*;

fn geom() -> GridGeometry {
    GridGeometry {
        origin: Point::new(10.0, 20.0),
        spec: GridSpec::square(4, 4, 44.0, 12.0, 10.0),
        halo: 21.0,
    }
}

#[test]
fn spec_extent() {
    let s = GridSpec::square(4, 4, 44.0, 12.0, 10.0);
    assert_eq!(s.width(), 212.0);
    assert_eq!(s.height(), 212.0);
    assert_eq!(GridSpec::square(0, 0, 10.0, 2.0, 0.0).width(), 0.0);
}

#[test]
fn cell_rects_follow_pitch() {
    let g = geom();
    assert_eq!(g.cell_rect(0, 0), Rect::new(10.0, 20.0, 54.0, 64.0));
    assert_eq!(g.cell_rect(1, 2), Rect::new(122.0, 76.0, 166.0, 120.0));
    assert_eq!(g.cell_center(0, 0), Point::new(32.0, 42.0));
    assert_eq!(g.cell_at(6), (1, 2));
    assert_eq!(g.len(), 16);
}

#[test]
fn span_is_order_independent() {
    let g = geom();
    let a = g.span_rect(0, 0, 1, 1);
    assert_eq!(a, g.span_rect(1, 1, 0, 0));
    assert_eq!(a, Rect::new(10.0, 20.0, 110.0, 120.0));
}

#[test]
fn bounds_include_halo() {
    let g = geom();
    assert_eq!(g.bounds(), Rect::new(10.0, 20.0, 222.0, 232.0));
    assert_eq!(g.bounds_with_halo(), Rect::new(-11.0, -1.0, 243.0, 253.0));
}
