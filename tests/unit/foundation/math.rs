use super::*;

#[test]
fn fnv_is_order_sensitive_and_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"tuto");
    a.write_u64(7);
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"tuto");
    b.write_u64(7);
    assert_eq!(a.finish(), b.finish());

    let mut c = Fnv1a64::new_default();
    c.write_bytes(b"otut");
    c.write_u64(7);
    assert_ne!(a.finish(), c.finish());
}

#[test]
fn premul_roundtrip_is_exact_for_opaque_and_close_for_translucent() {
    let mut px = vec![100u8, 50, 200, 255, 100, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[100, 50, 200, 255]);
    assert_eq!(&px[8..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[100, 50, 200, 255]);
    for (got, want) in px[4..7].iter().zip([100u8, 50, 200]) {
        assert!((i32::from(*got) - i32::from(want)).abs() <= 1);
    }
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
    assert_eq!(lerp(2.0, 10.0, 0.25), 4.0);
}
