use super::*;

#[test]
fn zero_radius_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap(), src);
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(f64::NAN), 0);
    assert_eq!(radius_for_sigma(1.5), 5);
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap(), src);
}

#[test]
fn single_pixel_spreads_and_keeps_energy() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 6);
}

#[test]
fn bad_inputs_are_rejected() {
    assert!(blur_rgba8_premul(&[0; 7], 1, 2, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0; 8], 1, 2, 1, 0.0).is_err());
}

#[test]
fn frames_blur_in_place() {
    let mut f = FrameRGBA {
        width: 5,
        height: 1,
        data: [0, 0, 0, 0, 0, 0, 0, 0, 200, 200, 200, 200, 0, 0, 0, 0, 0, 0, 0, 0].to_vec(),
        premultiplied: true,
    };
    blur_frame(&mut f, 1.0).unwrap();
    assert!(f.data[3] > 0 || f.data[7] > 0);
    assert!(f.data[11] < 200);
}
