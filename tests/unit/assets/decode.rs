use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let prepared = decode_image_fit(&png_bytes(img), 64).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_shrinks_to_fit_preserving_aspect() {
    let img = image::RgbaImage::from_pixel(72, 36, image::Rgba([255, 0, 0, 255]));
    let prepared = decode_image_fit(&png_bytes(img), 56).unwrap();
    assert_eq!((prepared.width, prepared.height), (56, 28));
    assert_eq!(prepared.rgba8_premul.len(), 56 * 28 * 4);
}

#[test]
fn decode_never_upscales() {
    let img = image::RgbaImage::from_pixel(20, 10, image::Rgba([0, 0, 0, 255]));
    let prepared = decode_image_fit(&png_bytes(img), 160).unwrap();
    assert_eq!((prepared.width, prepared.height), (20, 10));
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(decode_image_fit(b"not an image", 32).is_err());
}

#[test]
fn svg_rasterizes_to_requested_edge() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="36" height="18">
        <rect width="36" height="18" fill="#ff0000"/></svg>"##;
    let prepared = rasterize_svg_fit(svg, 72).unwrap();
    assert_eq!((prepared.width, prepared.height), (72, 36));
    assert_eq!(&prepared.rgba8_premul[..4], &[255, 0, 0, 255]);
    assert!(rasterize_svg_fit(b"<svg", 72).is_err());
}
