use super::*;

fn frame(data: Vec<u8>) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data,
        premultiplied: true,
    }
}

#[test]
fn transparent_frame_matches_canvas() {
    let f = FrameRGBA::transparent(Canvas::new(3, 2).unwrap());
    assert_eq!(f.data.len(), 24);
    assert!(f.data.iter().all(|&b| b == 0));
    assert!(f.check_len().is_ok());
}

#[test]
fn pixels_are_read_back_straight() {
    let f = frame(vec![128, 64, 0, 128, 10, 20, 30, 255]);
    assert_eq!(f.pixel(0, 0), Some([255, 128, 0, 128]));
    assert_eq!(f.pixel(1, 0), Some([10, 20, 30, 255]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.to_straight_rgba8()[..4], [255, 128, 0, 128]);
}

#[test]
fn fingerprint_tracks_content() {
    let a = frame(vec![1, 2, 3, 4, 5, 6, 7, 8]);
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.data[7] = 9;
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn short_buffers_are_rejected() {
    assert!(frame(vec![0; 7]).check_len().is_err());
}
