use std::{
    io::{Cursor, Read, Write},
    net::TcpListener,
    thread::JoinHandle,
};

use super::*;

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([250, 40, 40, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([30, 160, 60, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Serve `connections` HTTP requests on localhost; returns the base URL and the requested paths.
fn serve(
    connections: usize,
    route: impl Fn(&str) -> (u16, Vec<u8>) + Send + 'static,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let mut paths = Vec::new();
        for stream in listener.incoming().take(connections) {
            let mut stream = stream.unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
            }
            let head = String::from_utf8_lossy(&req).into_owned();
            let path = head.split_whitespace().nth(1).unwrap_or("").to_owned();
            let (status, body) = route(&path);
            let reason = if status == 200 { "OK" } else { "Error" };
            write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
            paths.push(path);
        }
        paths
    });
    (base, handle)
}

fn online_source(cache_dir: &Path, base_url: String) -> SpriteSource {
    SpriteSource {
        cache_dir: cache_dir.to_path_buf(),
        base_url,
        offline: false,
        timeout: Duration::from_secs(5),
    }
}

fn unreachable_source(dir: &Path) -> SpriteSource {
    SpriteSource {
        cache_dir: dir.to_path_buf(),
        base_url: "http://127.0.0.1:9/".to_owned(),
        offline: false,
        timeout: Duration::from_millis(500),
    }
}

#[test]
fn file_names_use_lowercase_hex_code_points() {
    assert_eq!(sprite_file_name("🍎"), "1f34e.png");
    assert_eq!(sprite_file_name("🌶️"), "1f336-fe0f.png");
    assert_eq!(sprite_file_name_without_vs16("🌶️").as_deref(), Some("1f336.png"));
    assert_eq!(sprite_file_name_without_vs16("🍎"), None);
}

#[test]
fn cached_png_is_loaded_and_thumbnailed() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("1f34e.png"), 72, 72);

    let mut loader = SpriteLoader::new(SpriteSource::offline(dir.path()));
    let sprite = loader.load_sprite("🍎", 40).unwrap();
    assert_eq!((sprite.width, sprite.height), (40, 40));
}

#[test]
fn stripped_variant_in_cache_is_used() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("1f336.png"), 72, 72);

    let mut loader = SpriteLoader::new(SpriteSource::offline(dir.path()));
    assert!(loader.load_sprite("🌶️", 72).is_some());
}

#[test]
fn cached_svg_is_rasterized() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("1f34a.svg"),
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="36" height="36"><circle cx="18" cy="18" r="16" fill="#f4900c"/></svg>"##,
    )
    .unwrap();

    let mut loader = SpriteLoader::new(SpriteSource::offline(dir.path()));
    let sprite = loader.load_sprite("🍊", 64).unwrap();
    assert_eq!((sprite.width, sprite.height), (64, 64));
}

#[test]
fn offline_miss_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = SpriteLoader::new(SpriteSource::offline(dir.path()));
    assert!(loader.load_sprite("🥝", 64).is_none());
    assert!(loader.load_sprite("", 64).is_none());
}

#[test]
fn unfetchable_identifier_is_absent_and_memoized() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = SpriteLoader::new(unreachable_source(dir.path()));
    assert!(loader.load_sprite("🌶️", 64).is_none());
    assert!(loader.memo.contains_key(&("🌶️".to_owned(), 64)));
    assert!(loader.load_sprite("🌶️", 64).is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn corrupt_cache_entry_is_absent_offline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("1f34e.png"), b"garbage").unwrap();
    let mut loader = SpriteLoader::new(SpriteSource::offline(dir.path()));
    assert!(loader.load_sprite("🍎", 64).is_none());
}

#[test]
fn missing_variant_is_retried_without_vs16_and_cached() {
    let png = png_bytes(72, 72);
    let (base, server) = serve(2, move |path| match path {
        "/1f336.png" => (200, png.clone()),
        _ => (404, Vec::new()),
    });
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache").join("emoji");

    let mut loader = SpriteLoader::new(online_source(&cache, base));
    let sprite = loader.load_sprite("🌶️", 36).unwrap();
    assert_eq!((sprite.width, sprite.height), (36, 36));
    assert_eq!(server.join().unwrap(), ["/1f336-fe0f.png", "/1f336.png"]);
    assert!(cache.join("1f336.png").is_file());
    assert!(!cache.join("1f336-fe0f.png").exists());

    let mut offline = SpriteLoader::new(SpriteSource::offline(&cache));
    assert!(offline.load_sprite("🌶️", 36).is_some());
}

#[test]
fn server_errors_are_not_retried() {
    let (base, server) = serve(1, |_| (500, Vec::new()));
    let dir = tempfile::tempdir().unwrap();

    let mut loader = SpriteLoader::new(online_source(dir.path(), base));
    assert!(loader.load_sprite("🌶️", 36).is_none());
    assert_eq!(server.join().unwrap(), ["/1f336-fe0f.png"]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
