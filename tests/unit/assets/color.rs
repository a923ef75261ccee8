use super::*;

#[test]
fn hex_forms_parse() {
    assert_eq!(parse_hex("#fff7f8").unwrap(), Rgba8::rgb(255, 247, 248));
    assert_eq!(parse_hex("#0f0").unwrap(), Rgba8::rgb(0, 255, 0));
    assert_eq!(
        parse_hex("#58ffd278").unwrap(),
        Rgba8::rgba(88, 255, 210, 120)
    );
    assert!(parse_hex("fff").is_err());
    assert!(parse_hex("#ggg").is_err());
    assert!(parse_hex("#12345").is_err());
}

#[test]
fn color_ref_json_accepts_hex_arrays_and_names() {
    let v: Vec<ColorRef> = serde_json::from_str(r##"["#ffa25f", [15, 23, 42], "card"]"##).unwrap();
    assert_eq!(v[0], ColorRef::Literal(Rgba8::rgb(255, 162, 95)));
    assert_eq!(v[1], ColorRef::Literal(Rgba8::rgb(15, 23, 42)));
    assert_eq!(v[2], ColorRef::named("card"));

    assert!(serde_json::from_str::<ColorRef>("[1, 2]").is_err());
    assert!(serde_json::from_str::<ColorRef>("[1, 2, 300]").is_err());
}

#[test]
fn palette_resolves_and_rejects_unknown_names() {
    let pal = Palette::new().with("card", Rgba8::rgb(255, 226, 231));
    assert_eq!(
        pal.resolve(&ColorRef::named("card")).unwrap(),
        Rgba8::rgb(255, 226, 231)
    );
    assert_eq!(
        pal.resolve(&Rgba8::BLACK.into()).unwrap(),
        Rgba8::BLACK
    );
    let err = pal.resolve(&ColorRef::named("ink")).unwrap_err();
    assert!(err.to_string().contains("unknown palette color 'ink'"));
}

#[test]
fn palette_serializes_as_hex_map() {
    let pal = Palette::new()
        .with("bg", Rgba8::rgb(255, 247, 248))
        .with("soft", Rgba8::rgba(88, 255, 210, 120));
    let json = serde_json::to_string(&pal).unwrap();
    assert_eq!(json, r##"{"bg":"#fff7f8","soft":"#58ffd278"}"##);
    let back: Palette = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pal);
}
