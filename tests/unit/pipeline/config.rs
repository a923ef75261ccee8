use super::*;

#[test]
fn defaults_match_the_documented_layout() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.out_dir, PathBuf::from("tutos"));
    assert_eq!(cfg.sprite_cache_dir, PathBuf::from("emoji"));
    assert!(cfg.sprite_base_url.contains("twemoji@14.0.2/assets/72x72"));
    assert!(!cfg.offline);
    assert_eq!(cfg.fetch_timeout, Duration::from_secs(10));
}

#[test]
fn env_overrides_apply() {
    let cfg = GeneratorConfig::default().with_env(|k| match k {
        ENV_SPRITE_BASE_URL => Some(" http://localhost:9/sprites/ ".to_owned()),
        ENV_OFFLINE => Some("TRUE".to_owned()),
        _ => None,
    });
    assert_eq!(cfg.sprite_base_url, "http://localhost:9/sprites/");
    assert!(cfg.offline);

    let cfg = GeneratorConfig::default()
        .with_offline(true)
        .with_env(|k| (k == ENV_OFFLINE).then(|| "0".to_owned()));
    assert!(!cfg.offline);

    let cfg = GeneratorConfig::default().with_env(|_| Some(String::new()));
    assert_eq!(cfg.sprite_base_url, DEFAULT_SPRITE_BASE_URL);
}

#[test]
fn sprite_source_mirrors_the_config() {
    let cfg = GeneratorConfig::default()
        .with_sprite_cache_dir("/tmp/cache")
        .with_out_dir("out")
        .with_offline(true);
    let src = cfg.sprite_source();
    assert_eq!(src.cache_dir, PathBuf::from("/tmp/cache"));
    assert!(src.offline);
    assert_eq!(src.timeout, cfg.fetch_timeout);
    assert_eq!(cfg.out_dir, PathBuf::from("out"));
}
