use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::Cosine,
];

#[test]
fn endpoints_are_exact() {
    for e in ALL {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
    }
}

#[test]
fn monotone_on_unit_interval() {
    for e in ALL {
        let mut prev = e.apply(0.0);
        for i in 1..=200 {
            let v = e.apply(f64::from(i) / 200.0);
            assert!(v + 1e-12 >= prev, "{e:?} decreased at {i}");
            prev = v;
        }
    }
}

#[test]
fn clamps_out_of_range_input() {
    assert_eq!(Ease::Cosine.apply(-3.0), 0.0);
    assert_eq!(Ease::Cosine.apply(4.0), 1.0);
}

#[test]
fn cosine_is_symmetric_about_midpoint() {
    let e = Ease::Cosine;
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
}

#[test]
fn default_is_cosine_and_serializes_snake_case() {
    assert_eq!(Ease::default(), Ease::Cosine);
    assert_eq!(
        serde_json::to_string(&Ease::InOutQuad).unwrap(),
        "\"in_out_quad\""
    );
}
